//! Outgoing filter aggregation
//!
//! The filter sent to peer P is our own transformed key plus the received
//! filters of every *other* on-tree peer. Leaving P's own filter out is what
//! keeps interest from being reflected back down the link it came from.
//!
//! ## Anti-flap
//!
//! One bits are added immediately but removed late. While P is not pending
//! cleanup, the previous `send` filter is OR-ed into the result. If that
//! kept bits the clean union would have dropped, the entry counts a
//! retained cycle; once `retention_cycles` is reached it is marked
//! `pending_cleanup` and the following pass is strict.

use super::bloom_filter::BloomFilter;
use super::entities::PublicKey;
use super::invariants::InvariantViolation;
use super::peer_entry::{PeerBloomEntry, PeerTable};

/// Computes the filter to send to each on-tree peer.
#[derive(Clone, Copy, Debug)]
pub struct BloomAggregator {
    retention_cycles: u32,
}

impl Default for BloomAggregator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BloomAggregator {
    /// `retention_cycles` = number of passes a no-longer-needed one bit
    /// survives. `0` disables retention.
    pub fn new(retention_cycles: u32) -> Self {
        Self { retention_cycles }
    }

    pub fn retention_cycles(&self) -> u32 {
        self.retention_cycles
    }

    /// Recompute the filter for `peer` and store it as the new `send`.
    ///
    /// Returns `Some(filter)` if it differs from what was last sent and
    /// must go out on every link to `peer`, `None` if nothing changed.
    pub fn filter_for(
        &self,
        table: &mut PeerTable,
        peer: &PublicKey,
        local_xkey: &PublicKey,
    ) -> Result<Option<BloomFilter>, InvariantViolation> {
        if !table.contains(peer) {
            return Err(InvariantViolation::UnknownPeer { peer: *peer });
        }

        let mut clean = BloomFilter::new();
        clean.insert(local_xkey.as_ref());
        for (key, entry) in table.iter() {
            if entry.on_tree && key != peer {
                clean.union_with(&entry.recv);
            }
        }

        let entry = table
            .get_mut(peer)
            .ok_or(InvariantViolation::UnknownPeer { peer: *peer })?;
        let next = self.apply_retention(entry, clean);

        if next == entry.send {
            return Ok(None);
        }
        entry.send = next.clone();
        Ok(Some(next))
    }

    fn apply_retention(&self, entry: &mut PeerBloomEntry, clean: BloomFilter) -> BloomFilter {
        if self.retention_cycles == 0 {
            return clean;
        }

        if entry.pending_cleanup {
            entry.pending_cleanup = false;
            entry.retained_cycles = 0;
            return clean;
        }

        let mut kept = clean.clone();
        kept.union_with(&entry.send);
        if kept == clean {
            entry.retained_cycles = 0;
            return clean;
        }

        entry.retained_cycles += 1;
        if entry.retained_cycles >= self.retention_cycles {
            entry.pending_cleanup = true;
        }
        kept
    }
}
