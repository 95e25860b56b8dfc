//! In-memory routing state
//!
//! Stands in for the tree-construction protocol: whoever owns the real tree
//! writes parents and links here, the membership core only reads.

use parking_lot::RwLock;

use crate::domain::{LinkId, PeerLink, PublicKey, RoutingSnapshot};
use crate::ports::RoutingStateProvider;

/// Shared, lock-protected [`RoutingSnapshot`].
#[derive(Debug, Default)]
pub struct InMemoryRoutingTable {
    state: RwLock<RoutingSnapshot>,
}

impl InMemoryRoutingTable {
    /// A node with no neighbours is the root of its own tree.
    pub fn new(local: PublicKey) -> Self {
        Self::from_snapshot(RoutingSnapshot::new().with_parent(local, local))
    }

    pub fn from_snapshot(snapshot: RoutingSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub fn set_parent(&self, node: PublicKey, parent: PublicKey) {
        self.state.write().set_parent(node, parent);
    }

    pub fn remove_node(&self, node: &PublicKey) {
        self.state.write().remove_node(node);
    }

    pub fn add_link(&self, peer: PublicKey, link: PeerLink) {
        self.state.write().add_link(peer, link);
    }

    /// Returns true if that was the last link to `peer`.
    pub fn remove_link(&self, peer: &PublicKey, link: LinkId) -> bool {
        self.state.write().remove_link(peer, link)
    }

    /// Apply several changes under one write lock.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut RoutingSnapshot),
    {
        f(&mut self.state.write());
    }
}

impl RoutingStateProvider for InMemoryRoutingTable {
    fn snapshot(&self) -> RoutingSnapshot {
        self.state.read().clone()
    }

    fn links(&self, peer: &PublicKey) -> Vec<PeerLink> {
        self.state.read().links(peer).to_vec()
    }
}
