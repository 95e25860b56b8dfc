//! Tree membership tracking
//!
//! A peer is on-tree iff it is our parent or we are its parent. The flag is
//! recomputed for every known peer on each maintenance pass, from a fresh
//! routing snapshot.

use super::entities::PublicKey;
use super::invariants::InvariantViolation;
use super::peer_entry::PeerTable;
use super::routing::RoutingSnapshot;

/// Recomputes `on_tree` for every entry in a [`PeerTable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeMembershipTracker;

impl TreeMembershipTracker {
    pub fn new() -> Self {
        Self
    }

    /// Update on-tree flags from `snapshot`.
    ///
    /// Returns the peers that just dropped off the tree, sorted by key.
    /// Their `send` filter has already been replaced with a blank one; the
    /// caller must push that blank filter out on every link to them, so a
    /// later rejoin cannot start from stale one bits.
    ///
    /// Peers whose tree info has not arrived yet are treated as off-tree.
    pub fn fix_on_tree(
        &self,
        table: &mut PeerTable,
        local: &PublicKey,
        snapshot: &RoutingSnapshot,
    ) -> Result<Vec<PublicKey>, InvariantViolation> {
        let local_parent = *snapshot
            .parent_of(local)
            .ok_or(InvariantViolation::MissingLocalRoutingInfo)?;

        let mut departed = Vec::new();
        for (key, entry) in table.iter_mut() {
            let was_on = entry.on_tree;
            entry.on_tree = local_parent == *key || snapshot.parent_of(key) == Some(local);

            if was_on && !entry.on_tree {
                entry.reset_send();
                departed.push(*key);
            }
        }

        departed.sort_unstable();
        Ok(departed)
    }
}
