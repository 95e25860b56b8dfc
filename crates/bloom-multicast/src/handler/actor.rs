//! Membership actor
//!
//! One tokio task per node. It owns the service outright and drains a
//! bounded queue of [`BloomCommand`]s, so the peer table needs no lock.
//! Commands from one sender are handled in the order they were sent;
//! there is no ordering across senders.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::{LinkId, MulticastConfig, MulticastPacket, PeerStatus, PublicKey};
use crate::error::BloomError;
use crate::events::{BloomCommand, TopologyChange};
use crate::ports::MembershipApi;

/// Owns a [`MembershipApi`] implementation and runs it on one task.
pub struct BloomActor<S> {
    service: S,
    rx: mpsc::Receiver<BloomCommand>,
    maintenance_interval: Option<Duration>,
    halt_on_invariant_violation: bool,
}

impl<S> BloomActor<S>
where
    S: MembershipApi + 'static,
{
    pub fn new(service: S, config: &MulticastConfig) -> (Self, BloomActorHandle) {
        let (tx, rx) = mpsc::channel(config.command_queue_capacity.max(1));
        let actor = Self {
            service,
            rx,
            maintenance_interval: config.maintenance_interval(),
            halt_on_invariant_violation: config.halt_on_invariant_violation,
        };
        (actor, BloomActorHandle { tx })
    }

    /// Create the actor and spawn it on the current runtime.
    pub fn spawn(
        service: S,
        config: &MulticastConfig,
    ) -> (BloomActorHandle, JoinHandle<Result<(), BloomError>>) {
        let (actor, handle) = Self::new(service, config);
        (handle, tokio::spawn(actor.run()))
    }

    /// Process commands until shutdown, until every handle is dropped, or
    /// until a fatal error when configured to halt on one.
    pub async fn run(mut self) -> Result<(), BloomError> {
        info!(
            interval_ms = self.maintenance_interval.map(|d| d.as_millis() as u64),
            "Membership actor started"
        );

        let mut ticker = self.maintenance_interval.map(|period| {
            let mut t = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            t.set_missed_tick_behavior(MissedTickBehavior::Delay);
            t
        });

        loop {
            let command = tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
                _ = next_tick(&mut ticker) => BloomCommand::RunMaintenance,
            };

            if matches!(command, BloomCommand::Shutdown) {
                break;
            }

            let kind = command.kind();
            if let Err(e) = self.dispatch(command) {
                if e.is_fatal() && self.halt_on_invariant_violation {
                    error!(command = kind, error = %e, "Membership actor halting");
                    return Err(e);
                }
                // Decode failures were already reported by the service.
                if matches!(e, BloomError::Decode { .. }) {
                    debug!(command = kind, error = %e, "Command failed");
                } else {
                    warn!(command = kind, error = %e, "Command failed");
                }
            }
        }

        info!("Membership actor stopped");
        Ok(())
    }

    fn dispatch(&mut self, command: BloomCommand) -> Result<(), BloomError> {
        match command {
            BloomCommand::FilterReceived { from, payload } => {
                self.service.handle_bloom(&from, &payload)
            }
            BloomCommand::RunMaintenance => self.service.do_maintenance().map(|_| ()),
            BloomCommand::SendMulticast {
                origin,
                dest,
                packet,
            } => self
                .service
                .send_multicast(&origin, &dest, packet)
                .map(|_| ()),
            BloomCommand::PeerTopologyChanged(change) => match change {
                TopologyChange::PeerKnown(peer) => {
                    self.service.add_peer(peer);
                    Ok(())
                }
                TopologyChange::PeerUnknown(peer) => {
                    self.service.remove_peer(&peer);
                    Ok(())
                }
                TopologyChange::LinkOpened { peer, link } => self.service.link_opened(&peer, link),
            },
            BloomCommand::Status { reply } => {
                // Requester may have given up.
                let _ = reply.send(self.service.peer_status());
                Ok(())
            }
            BloomCommand::Shutdown => Ok(()),
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Cloneable sender side of a [`BloomActor`].
#[derive(Clone, Debug)]
pub struct BloomActorHandle {
    tx: mpsc::Sender<BloomCommand>,
}

impl BloomActorHandle {
    async fn send(&self, command: BloomCommand) -> Result<(), BloomError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| BloomError::ActorStopped)
    }

    pub async fn filter_received(&self, from: PublicKey, payload: Vec<u8>) -> Result<(), BloomError> {
        self.send(BloomCommand::FilterReceived { from, payload }).await
    }

    pub async fn run_maintenance(&self) -> Result<(), BloomError> {
        self.send(BloomCommand::RunMaintenance).await
    }

    pub async fn send_multicast(
        &self,
        origin: PublicKey,
        dest: PublicKey,
        packet: MulticastPacket,
    ) -> Result<(), BloomError> {
        self.send(BloomCommand::SendMulticast {
            origin,
            dest,
            packet,
        })
        .await
    }

    pub async fn peer_known(&self, peer: PublicKey) -> Result<(), BloomError> {
        self.send(BloomCommand::PeerTopologyChanged(TopologyChange::PeerKnown(peer)))
            .await
    }

    pub async fn peer_unknown(&self, peer: PublicKey) -> Result<(), BloomError> {
        self.send(BloomCommand::PeerTopologyChanged(TopologyChange::PeerUnknown(peer)))
            .await
    }

    pub async fn link_opened(&self, peer: PublicKey, link: LinkId) -> Result<(), BloomError> {
        self.send(BloomCommand::PeerTopologyChanged(TopologyChange::LinkOpened {
            peer,
            link,
        }))
        .await
    }

    /// Per-peer status, taken after every command queued before it.
    pub async fn status(&self) -> Result<Vec<PeerStatus>, BloomError> {
        let (reply, rx) = oneshot::channel();
        self.send(BloomCommand::Status { reply }).await?;
        rx.await.map_err(|_| BloomError::ActorStopped)
    }

    pub async fn status_json(&self) -> Result<String, BloomError> {
        let status = self.status().await?;
        Ok(serde_json::to_string_pretty(&status)?)
    }

    pub async fn shutdown(&self) -> Result<(), BloomError> {
        self.send(BloomCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
