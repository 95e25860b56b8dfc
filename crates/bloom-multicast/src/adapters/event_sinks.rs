//! [`EventSink`] implementations

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::ports::{BloomEvent, EventSink};

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: BloomEvent) {
        match event {
            BloomEvent::FilterRejected { peer, error } => {
                warn!(peer = %peer, error = %error, "Rejected filter update");
            }
            BloomEvent::PeerLeftTree { peer } => {
                info!(peer = %peer, "Peer left tree");
            }
            BloomEvent::InvariantViolated(violation) => {
                error!(violation = %violation, "Invariant violation");
            }
        }
    }
}

/// Keeps every event in memory. Useful for diagnostics and tests.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<BloomEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BloomEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<BloomEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: BloomEvent) {
        self.events.lock().push(event);
    }
}
