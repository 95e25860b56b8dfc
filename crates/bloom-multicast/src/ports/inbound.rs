//! Inbound Ports (Driving Ports)
//!
//! The operations the per-node actor drives. Every method takes `&mut self`:
//! the implementor is owned by exactly one execution context.

use crate::domain::{LinkId, MulticastPacket, PeerStatus, PublicKey};
use crate::error::BloomError;

/// What a maintenance pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// Peers that dropped off the tree and got a blank filter.
    pub departed: Vec<PublicKey>,
    /// Peers that were sent a changed filter.
    pub updated: Vec<PublicKey>,
    /// On-tree peers whose filter was unchanged.
    pub unchanged: usize,
}

/// Primary membership API (Driving Port).
pub trait MembershipApi: Send {
    /// A peer became known (first link up). Creates a blank, off-tree entry.
    fn add_peer(&mut self, peer: PublicKey);

    /// A peer became entirely unknown. Its entry is dropped; the remaining
    /// peers learn about it at the next maintenance pass.
    fn remove_peer(&mut self, peer: &PublicKey);

    /// A new link to a known peer opened: resend the current filter on it.
    fn link_opened(&mut self, peer: &PublicKey, link: LinkId) -> Result<(), BloomError>;

    /// Replace a peer's received filter with a decoded update.
    fn handle_bloom(&mut self, from: &PublicKey, payload: &[u8]) -> Result<(), BloomError>;

    /// Recompute tree membership and redistribute changed filters.
    fn do_maintenance(&mut self) -> Result<MaintenanceReport, BloomError>;

    /// Forward a multicast packet. Returns the number of copies enqueued.
    fn send_multicast(
        &mut self,
        origin: &PublicKey,
        dest: &PublicKey,
        packet: MulticastPacket,
    ) -> Result<usize, BloomError>;

    fn is_on_tree(&self, peer: &PublicKey) -> bool;

    fn peer_status(&self) -> Vec<PeerStatus>;
}
