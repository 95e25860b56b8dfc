//! Read-only view of the spanning tree and open links.
//!
//! Produced by the routing layer, consumed once per maintenance tick. The
//! membership core never writes to it.

use std::collections::HashMap;

use super::entities::{LinkId, PeerLink, PublicKey};

/// Tree parents and link sets as seen by the local node at one instant.
#[derive(Clone, Debug, Default)]
pub struct RoutingSnapshot {
    /// Parent of every node whose tree info has arrived, the local node
    /// included. A root is its own parent.
    parents: HashMap<PublicKey, PublicKey>,
    /// Open links to each directly connected peer.
    links: HashMap<PublicKey, Vec<PeerLink>>,
}

impl RoutingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: record `node`'s tree parent.
    pub fn with_parent(mut self, node: PublicKey, parent: PublicKey) -> Self {
        self.parents.insert(node, parent);
        self
    }

    /// Builder method: record an open link to `peer`.
    pub fn with_link(mut self, peer: PublicKey, link: PeerLink) -> Self {
        self.add_link(peer, link);
        self
    }

    pub fn set_parent(&mut self, node: PublicKey, parent: PublicKey) {
        self.parents.insert(node, parent);
    }

    pub fn remove_node(&mut self, node: &PublicKey) {
        self.parents.remove(node);
    }

    pub fn add_link(&mut self, peer: PublicKey, link: PeerLink) {
        let links = self.links.entry(peer).or_default();
        links.retain(|l| l.id != link.id);
        links.push(link);
    }

    /// Remove a link. Returns true if it was the last link to that peer.
    pub fn remove_link(&mut self, peer: &PublicKey, link: LinkId) -> bool {
        let Some(links) = self.links.get_mut(peer) else {
            return false;
        };
        links.retain(|l| l.id != link);
        if links.is_empty() {
            self.links.remove(peer);
            return true;
        }
        false
    }

    /// Parent of `node`, if its tree info has arrived.
    pub fn parent_of(&self, node: &PublicKey) -> Option<&PublicKey> {
        self.parents.get(node)
    }

    /// Open links to `peer` (empty if none).
    pub fn links(&self, peer: &PublicKey) -> &[PeerLink] {
        self.links.get(peer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Peers with at least one open link.
    pub fn connected_peers(&self) -> impl Iterator<Item = &PublicKey> {
        self.links.keys()
    }
}
