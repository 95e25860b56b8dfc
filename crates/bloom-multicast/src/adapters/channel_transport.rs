//! Channel-backed transport
//!
//! Frames go onto a bounded tokio channel instead of a socket. The receiving
//! half is handed to whatever does the actual link I/O (or to a test).

use std::collections::HashSet;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::{LinkId, MulticastPacket, PublicKey};
use crate::error::TransportError;
use crate::ports::PeerTransport;

/// One framed message bound for a peer link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundFrame {
    Bloom {
        peer: PublicKey,
        link: LinkId,
        payload: Vec<u8>,
    },
    Multicast {
        peer: PublicKey,
        link: LinkId,
        packet: MulticastPacket,
    },
}

impl OutboundFrame {
    pub fn peer(&self) -> &PublicKey {
        match self {
            OutboundFrame::Bloom { peer, .. } | OutboundFrame::Multicast { peer, .. } => peer,
        }
    }

    pub fn link(&self) -> LinkId {
        match self {
            OutboundFrame::Bloom { link, .. } | OutboundFrame::Multicast { link, .. } => *link,
        }
    }
}

/// [`PeerTransport`] that enqueues [`OutboundFrame`]s without blocking.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::Sender<OutboundFrame>,
    closed: Mutex<HashSet<(PublicKey, LinkId)>>,
}

impl ChannelTransport {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let transport = Self {
            tx,
            closed: Mutex::new(HashSet::new()),
        };
        (transport, rx)
    }

    /// Sends on this link fail with [`TransportError::LinkClosed`] from now on.
    pub fn close_link(&self, peer: PublicKey, link: LinkId) {
        self.closed.lock().insert((peer, link));
    }

    fn push(&self, frame: OutboundFrame) -> Result<(), TransportError> {
        let peer = *frame.peer();
        let link = frame.link();
        if self.closed.lock().contains(&(peer, link)) {
            return Err(TransportError::LinkClosed { peer, link });
        }

        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::QueueFull { peer },
            mpsc::error::TrySendError::Closed(_) => TransportError::LinkClosed { peer, link },
        })?;
        trace!(peer = %peer, link = %link, "Frame enqueued");
        Ok(())
    }
}

impl PeerTransport for ChannelTransport {
    fn send_bloom(&self, peer: &PublicKey, link: LinkId, payload: Vec<u8>) -> Result<(), TransportError> {
        self.push(OutboundFrame::Bloom {
            peer: *peer,
            link,
            payload,
        })
    }

    fn send_multicast(
        &self,
        peer: &PublicKey,
        link: LinkId,
        packet: MulticastPacket,
    ) -> Result<(), TransportError> {
        self.push(OutboundFrame::Multicast {
            peer: *peer,
            link,
            packet,
        })
    }
}
