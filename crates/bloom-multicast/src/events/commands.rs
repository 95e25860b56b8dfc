//! Queued actor messages
//!
//! Everything that touches peer filter state arrives as one of these and is
//! processed to completion, one at a time.

use tokio::sync::oneshot;

use crate::domain::{LinkId, MulticastPacket, PeerStatus, PublicKey};

/// A change in which peers/links exist, reported by the link layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyChange {
    /// First link to this peer came up.
    PeerKnown(PublicKey),
    /// Last link to this peer went down.
    PeerUnknown(PublicKey),
    /// An additional link to an already known peer came up.
    LinkOpened { peer: PublicKey, link: LinkId },
}

/// Messages consumed by [`crate::handler::BloomActor`].
#[derive(Debug)]
pub enum BloomCommand {
    /// Encoded filter bytes from a neighbour.
    FilterReceived { from: PublicKey, payload: Vec<u8> },
    RunMaintenance,
    SendMulticast {
        origin: PublicKey,
        dest: PublicKey,
        packet: MulticastPacket,
    },
    PeerTopologyChanged(TopologyChange),
    /// Diagnostic snapshot of every peer entry.
    Status { reply: oneshot::Sender<Vec<PeerStatus>> },
    Shutdown,
}

impl BloomCommand {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BloomCommand::FilterReceived { .. } => "filter_received",
            BloomCommand::RunMaintenance => "run_maintenance",
            BloomCommand::SendMulticast { .. } => "send_multicast",
            BloomCommand::PeerTopologyChanged(_) => "topology_changed",
            BloomCommand::Status { .. } => "status",
            BloomCommand::Shutdown => "shutdown",
        }
    }
}
