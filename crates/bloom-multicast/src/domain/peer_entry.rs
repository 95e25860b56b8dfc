//! Per-peer filter state and the table that owns it.

use std::collections::hash_map::{self, HashMap};

use serde::Serialize;

use super::bloom_filter::BloomFilter;
use super::entities::PublicKey;

/// Filter state kept for one neighbouring peer.
///
/// `recv` is authoritative interest data from the peer. It is only ever
/// replaced by a freshly decoded filter, never edited.
#[derive(Clone, Debug, Default)]
pub struct PeerBloomEntry {
    /// Last filter sent to this peer; doubles as the "unchanged" memo.
    pub(crate) send: BloomFilter,
    /// Last filter received from this peer.
    pub(crate) recv: BloomFilter,
    /// Peer is our tree parent or one of our children.
    pub(crate) on_tree: bool,
    /// `send` holds retained one bits; next aggregation must be strict.
    pub(crate) pending_cleanup: bool,
    /// Consecutive cycles in which retained bits were kept.
    pub(crate) retained_cycles: u32,
}

impl PeerBloomEntry {
    /// Fresh entry: blank filters, off-tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_filter(&self) -> &BloomFilter {
        &self.send
    }

    pub fn recv_filter(&self) -> &BloomFilter {
        &self.recv
    }

    pub fn is_on_tree(&self) -> bool {
        self.on_tree
    }

    pub fn pending_cleanup(&self) -> bool {
        self.pending_cleanup
    }

    /// Swap in a newly received filter.
    pub(crate) fn replace_recv(&mut self, filter: BloomFilter) {
        self.recv = filter;
    }

    /// Drop the sent filter and cleanup state after leaving the tree.
    pub(crate) fn reset_send(&mut self) {
        self.send = BloomFilter::new();
        self.pending_cleanup = false;
        self.retained_cycles = 0;
    }
}

/// Diagnostic view of one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PeerStatus {
    pub peer: PublicKey,
    pub on_tree: bool,
    pub pending_cleanup: bool,
    pub send_bits: usize,
    pub recv_bits: usize,
}

/// All known peers' filter state, keyed by public key.
///
/// Owned by exactly one execution context; nothing else holds references
/// into it.
#[derive(Clone, Debug, Default)]
pub struct PeerTable {
    entries: HashMap<PublicKey, PeerBloomEntry>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Returns false if it was already known, in which
    /// case its state is left alone.
    pub fn insert(&mut self, key: PublicKey) -> bool {
        match self.entries.entry(key) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(PeerBloomEntry::new());
                true
            }
        }
    }

    pub fn remove(&mut self, key: &PublicKey) -> Option<PeerBloomEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &PublicKey) -> Option<&PeerBloomEntry> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &PublicKey) -> Option<&mut PeerBloomEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &PublicKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_on_tree(&self, key: &PublicKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.on_tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PublicKey, &PeerBloomEntry)> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&PublicKey, &mut PeerBloomEntry)> {
        self.entries.iter_mut()
    }

    /// On-tree peers, sorted by key so iteration is reproducible.
    pub fn on_tree_peers(&self) -> Vec<PublicKey> {
        let mut keys: Vec<PublicKey> = self
            .entries
            .iter()
            .filter(|(_, e)| e.on_tree)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn status(&self) -> Vec<PeerStatus> {
        let mut out: Vec<PeerStatus> = self
            .entries
            .iter()
            .map(|(k, e)| PeerStatus {
                peer: *k,
                on_tree: e.on_tree,
                pending_cleanup: e.pending_cleanup,
                send_bits: e.send.bits_set(),
                recv_bits: e.recv.bits_set(),
            })
            .collect();
        out.sort_unstable_by(|a, b| a.peer.cmp(&b.peer));
        out
    }
}
