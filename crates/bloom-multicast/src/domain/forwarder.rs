//! Per-packet multicast target selection
//!
//! Pure decision logic: which on-tree neighbours get a copy of a packet,
//! and on which link. Sending is left to the service.

use super::entities::{LinkId, PeerLink, PublicKey};
use super::invariants::InvariantViolation;
use super::peer_entry::PeerTable;

/// One copy of a packet: which peer, over which link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForwardTarget {
    pub peer: PublicKey,
    pub link: LinkId,
}

/// Outcome of target selection for one packet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwardPlan {
    /// Peers whose filter says "maybe interested", sorted by peer key.
    pub targets: Vec<ForwardTarget>,
    /// On-tree peers skipped because their filter said "definitely not".
    pub suppressed: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MulticastForwarder;

impl MulticastForwarder {
    pub fn new() -> Self {
        Self
    }

    /// Pick targets for a packet whose transformed destination is `xdest`.
    ///
    /// The origin peer is never a target. For each matching peer the link
    /// with the lowest priority value wins, ties broken by lowest link id.
    /// An on-tree peer with no links is a bookkeeping bug; the whole plan
    /// is rejected so nothing is sent partially.
    pub fn select_targets<F>(
        &self,
        table: &PeerTable,
        origin: &PublicKey,
        xdest: &PublicKey,
        links_of: F,
    ) -> Result<ForwardPlan, InvariantViolation>
    where
        F: Fn(&PublicKey) -> Vec<PeerLink>,
    {
        let mut plan = ForwardPlan::default();

        for peer in table.on_tree_peers() {
            if peer == *origin {
                continue;
            }
            let Some(entry) = table.get(&peer) else {
                continue;
            };
            if !entry.recv_filter().contains(xdest.as_ref()) {
                plan.suppressed += 1;
                continue;
            }

            let best = links_of(&peer)
                .into_iter()
                .min_by_key(|l| (l.priority, l.id))
                .ok_or(InvariantViolation::OnTreePeerWithoutLinks { peer })?;
            plan.targets.push(ForwardTarget {
                peer,
                link: best.id,
            });
        }

        Ok(plan)
    }
}
