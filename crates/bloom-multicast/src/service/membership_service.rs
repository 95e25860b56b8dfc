//! Bloom Membership Service
//!
//! Orchestrates the domain pieces against the outbound ports. Owns the
//! [`PeerTable`]; must be driven from a single execution context (see
//! [`crate::handler::BloomActor`]).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::domain::{
    BloomAggregator, BloomFilter, InvariantViolation, LinkId, MulticastConfig, MulticastForwarder,
    MulticastPacket, PeerStatus, PeerTable, PublicKey, TreeMembershipTracker,
};
use crate::error::BloomError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{
    BloomEvent, EventSink, IdentityTransform, KeyTransform, MaintenanceReport, MembershipApi,
    NoOpEventSink, PeerTransport, RoutingStateProvider,
};

/// One encoded filter bound for one link.
struct PlannedSend {
    peer: PublicKey,
    link: LinkId,
    payload: Vec<u8>,
}

/// Outcome of a maintenance pass that has not been applied yet.
struct MaintenancePlan {
    sends: Vec<PlannedSend>,
    report: MaintenanceReport,
    peers: PeerTable,
}

/// Per-node multicast membership state and its maintenance logic.
pub struct BloomMembershipService {
    local: PublicKey,
    local_xkey: PublicKey,
    config: MulticastConfig,
    peers: PeerTable,
    tracker: TreeMembershipTracker,
    aggregator: BloomAggregator,
    forwarder: MulticastForwarder,
    routing: Arc<dyn RoutingStateProvider>,
    transport: Arc<dyn PeerTransport>,
    transform: Arc<dyn KeyTransform>,
    events: Arc<dyn EventSink>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl BloomMembershipService {
    /// Create a service for node `local` with identity key transform, no
    /// event sink and no metrics.
    pub fn new(
        local: PublicKey,
        config: MulticastConfig,
        routing: Arc<dyn RoutingStateProvider>,
        transport: Arc<dyn PeerTransport>,
    ) -> Self {
        Self {
            local,
            local_xkey: local,
            aggregator: BloomAggregator::new(config.retention_cycles),
            config,
            peers: PeerTable::new(),
            tracker: TreeMembershipTracker::new(),
            forwarder: MulticastForwarder::new(),
            routing,
            transport,
            transform: Arc::new(IdentityTransform),
            events: Arc::new(NoOpEventSink),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    pub fn with_key_transform(mut self, transform: Arc<dyn KeyTransform>) -> Self {
        self.local_xkey = transform.transform(&self.local);
        self.transform = transform;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn local_key(&self) -> &PublicKey {
        &self.local
    }

    pub fn config(&self) -> &MulticastConfig {
        &self.config
    }

    pub fn peers(&self) -> &PeerTable {
        &self.peers
    }

    /// Multicast originated by this node. No neighbour is excluded.
    pub fn send_local_multicast(
        &mut self,
        dest: &PublicKey,
        packet: MulticastPacket,
    ) -> Result<usize, BloomError> {
        let origin = self.local;
        self.send_multicast(&origin, dest, packet)
    }

    fn violation(&self, violation: InvariantViolation) -> BloomError {
        error!(node = %self.local, violation = %violation, "Invariant violation, operation aborted");
        self.metrics.record_invariant_violation();
        self.events
            .emit(BloomEvent::InvariantViolated(violation.clone()));
        BloomError::Invariant(violation)
    }

    /// Build every send of a maintenance pass against a copy of the peer
    /// table. The copy replaces `self.peers` only once the whole plan is
    /// known to be consistent, so an aborted pass leaves no trace.
    fn plan_maintenance(&mut self) -> Result<MaintenancePlan, InvariantViolation> {
        let snapshot = self.routing.snapshot();
        let mut peers = self.peers.clone();
        let departed = self.tracker.fix_on_tree(&mut peers, &self.local, &snapshot)?;

        let on_tree = peers.on_tree_peers();
        for peer in &on_tree {
            if snapshot.links(peer).is_empty() {
                return Err(InvariantViolation::OnTreePeerWithoutLinks { peer: *peer });
            }
        }

        let mut plan = Vec::new();
        let mut report = MaintenanceReport::default();

        if !departed.is_empty() {
            let blank = BloomFilter::new().encode()?;
            for peer in &departed {
                for link in snapshot.links(peer) {
                    plan.push(PlannedSend {
                        peer: *peer,
                        link: link.id,
                        payload: blank.clone(),
                    });
                }
            }
        }
        report.departed = departed;

        for peer in on_tree {
            match self
                .aggregator
                .filter_for(&mut peers, &peer, &self.local_xkey)?
            {
                Some(filter) => {
                    let payload = filter.encode()?;
                    for link in snapshot.links(&peer) {
                        plan.push(PlannedSend {
                            peer,
                            link: link.id,
                            payload: payload.clone(),
                        });
                    }
                    report.updated.push(peer);
                }
                None => report.unchanged += 1,
            }
        }

        Ok(MaintenancePlan {
            sends: plan,
            report,
            peers,
        })
    }

    fn deliver(&self, send: PlannedSend) {
        let PlannedSend {
            peer,
            link,
            payload,
        } = send;
        let len = payload.len();
        match self.transport.send_bloom(&peer, link, payload) {
            Ok(()) => debug!(peer = %peer, link = %link, bytes = len, "Sent filter"),
            Err(e) => warn!(peer = %peer, link = %link, error = %e, "Filter send failed"),
        }
    }
}

impl MembershipApi for BloomMembershipService {
    fn add_peer(&mut self, peer: PublicKey) {
        if self.peers.insert(peer) {
            debug!(peer = %peer, "Peer known");
        }
    }

    fn remove_peer(&mut self, peer: &PublicKey) {
        if self.peers.remove(peer).is_some() {
            debug!(peer = %peer, "Peer unknown, entry dropped");
        }
    }

    fn link_opened(&mut self, peer: &PublicKey, link: LinkId) -> Result<(), BloomError> {
        let Some(entry) = self.peers.get(peer) else {
            debug!(peer = %peer, link = %link, "Link opened to unknown peer, ignoring");
            return Ok(());
        };

        let payload = entry.send_filter().encode().map_err(|v| self.violation(v))?;
        self.transport.send_bloom(peer, link, payload)?;
        debug!(peer = %peer, link = %link, "Resent current filter on new link");
        Ok(())
    }

    fn handle_bloom(&mut self, from: &PublicKey, payload: &[u8]) -> Result<(), BloomError> {
        if !self.peers.contains(from) {
            debug!(peer = %from, "Filter from unknown peer, ignoring");
            return Ok(());
        }

        let filter = match BloomFilter::decode(payload) {
            Ok(filter) => filter,
            Err(source) => {
                warn!(peer = %from, bytes = payload.len(), error = %source, "Malformed filter dropped");
                self.metrics.record_filter_received(false);
                self.events.emit(BloomEvent::FilterRejected {
                    peer: *from,
                    error: source.clone(),
                });
                return Err(BloomError::Decode {
                    peer: *from,
                    source,
                });
            }
        };

        let entry = self
            .peers
            .get_mut(from)
            .ok_or_else(|| BloomError::Invariant(InvariantViolation::UnknownPeer { peer: *from }))?;
        entry.replace_recv(filter);
        self.metrics.record_filter_received(true);
        debug!(peer = %from, "Filter updated");
        Ok(())
    }

    fn do_maintenance(&mut self) -> Result<MaintenanceReport, BloomError> {
        let start = Instant::now();
        let MaintenancePlan {
            sends,
            report,
            peers,
        } = self.plan_maintenance().map_err(|v| self.violation(v))?;
        self.peers = peers;

        for peer in &report.departed {
            info!(peer = %peer, "Peer left tree, blank filter sent");
            self.metrics.record_tree_departure();
            self.events.emit(BloomEvent::PeerLeftTree { peer: *peer });
        }
        for _ in &report.updated {
            self.metrics.record_filter_sent();
        }
        for _ in 0..report.unchanged {
            self.metrics.record_filter_unchanged();
        }

        for send in sends {
            self.deliver(send);
        }

        self.metrics.record_maintenance(start.elapsed());
        debug!(
            departed = report.departed.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged,
            "Maintenance complete"
        );
        Ok(report)
    }

    fn send_multicast(
        &mut self,
        origin: &PublicKey,
        dest: &PublicKey,
        packet: MulticastPacket,
    ) -> Result<usize, BloomError> {
        let xdest = self.transform.transform(dest);
        let routing = &self.routing;
        let plan = self
            .forwarder
            .select_targets(&self.peers, origin, &xdest, |peer| routing.links(peer))
            .map_err(|v| self.violation(v))?;

        let mut sent = 0;
        for target in &plan.targets {
            match self
                .transport
                .send_multicast(&target.peer, target.link, packet.clone())
            {
                Ok(()) => sent += 1,
                Err(e) => {
                    warn!(peer = %target.peer, link = %target.link, error = %e, "Multicast send failed")
                }
            }
        }

        self.metrics.record_multicast(sent, plan.suppressed);
        debug!(
            origin = %origin,
            dest = %dest,
            forwarded = sent,
            suppressed = plan.suppressed,
            "Multicast forwarded"
        );
        Ok(sent)
    }

    fn is_on_tree(&self, peer: &PublicKey) -> bool {
        self.peers.is_on_tree(peer)
    }

    fn peer_status(&self) -> Vec<PeerStatus> {
        self.peers.status()
    }
}
