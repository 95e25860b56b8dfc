//! Outbound Ports (Driven Ports)
//!
//! Collaborators the membership core depends on but does not implement:
//! routing state, link transport, the key transform, and an event sink.

use crate::domain::{InvariantViolation, LinkId, MulticastPacket, PeerLink, PublicKey, RoutingSnapshot};
use crate::error::{DecodeError, TransportError};

/// Read-only access to the spanning tree and link sets.
pub trait RoutingStateProvider: Send + Sync {
    /// Consistent snapshot taken at the start of a maintenance pass.
    fn snapshot(&self) -> RoutingSnapshot;

    /// Current open links to one peer.
    fn links(&self, peer: &PublicKey) -> Vec<PeerLink> {
        self.snapshot().links(peer).to_vec()
    }
}

/// "Send framed message to peer/link".
///
/// Failures are reported, never retried by the caller.
pub trait PeerTransport: Send + Sync {
    /// Send an encoded filter on one link.
    fn send_bloom(&self, peer: &PublicKey, link: LinkId, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Enqueue a multicast packet on one link.
    fn send_multicast(
        &self,
        peer: &PublicKey,
        link: LinkId,
        packet: MulticastPacket,
    ) -> Result<(), TransportError>;
}

/// One-way pseudonymizing transform applied to keys before they touch a
/// filter. Opaque to this crate.
pub trait KeyTransform: Send + Sync {
    fn transform(&self, key: &PublicKey) -> PublicKey;
}

impl<F> KeyTransform for F
where
    F: Fn(&PublicKey) -> PublicKey + Send + Sync,
{
    fn transform(&self, key: &PublicKey) -> PublicKey {
        self(key)
    }
}

/// Leaves keys unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl KeyTransform for IdentityTransform {
    fn transform(&self, key: &PublicKey) -> PublicKey {
        *key
    }
}

/// Notable events surfaced to the embedding application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BloomEvent {
    /// A peer's filter update was malformed and dropped.
    FilterRejected { peer: PublicKey, error: DecodeError },
    /// A peer dropped off the tree and was sent a blank filter.
    PeerLeftTree { peer: PublicKey },
    /// Local bookkeeping is inconsistent; the operation was aborted.
    InvariantViolated(InvariantViolation),
}

/// Receives [`BloomEvent`]s. Replaces any process-global reporting.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BloomEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _: BloomEvent) {}
}
