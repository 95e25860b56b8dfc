//! # Actor Flow
//!
//! Three nodes, each a spawned [`BloomActor`], wired together by pump tasks
//! that move frames from one node's [`ChannelTransport`] into the other
//! node's handle:
//!
//! ```text
//! [actor A] ─frames→ pump A ─filter_received→ [actor B] / [actor C]
//! [actor B] ─frames→ pump B ─filter_received→ [actor A]
//! [actor C] ─frames→ pump C ─filter_received→ [actor A]
//! ```

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use bloom_multicast::{
        BloomActor, BloomActorHandle, BloomError, BloomMembershipService, ChannelTransport,
        InMemoryRoutingTable, MulticastConfig, MulticastConfigBuilder, OutboundFrame, PeerLink,
        PeerStatus, PublicKey,
    };
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use crate::support::{init_tracing, key, sim_packet};

    const WAIT: Duration = Duration::from_secs(5);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        handle: BloomActorHandle,
        task: JoinHandle<Result<(), BloomError>>,
        outbox: mpsc::Receiver<OutboundFrame>,
    }

    /// A is root with children B and C. One link per edge.
    fn star(config: &MulticastConfig) -> HashMap<PublicKey, Node> {
        let (a, b, c) = (key(1), key(2), key(3));
        let edges = [(a, b, 1), (a, c, 2)];

        let mut nodes = HashMap::new();
        for me in [a, b, c] {
            let routing = Arc::new(InMemoryRoutingTable::new(me));
            routing.update(|s| {
                s.set_parent(a, a);
                s.set_parent(b, a);
                s.set_parent(c, a);
                for (x, y, id) in edges {
                    if x == me {
                        s.add_link(y, PeerLink::new(id, 0));
                    } else if y == me {
                        s.add_link(x, PeerLink::new(id, 0));
                    }
                }
            });
            let (transport, outbox) = ChannelTransport::new(256);
            let service =
                BloomMembershipService::new(me, config.clone(), routing, Arc::new(transport));
            let (handle, task) = BloomActor::spawn(service, config);
            nodes.insert(me, Node { handle, task, outbox });
        }
        nodes
    }

    /// Forward filter frames to the target actor; report multicast arrivals.
    fn spawn_pump(
        from: PublicKey,
        mut outbox: mpsc::Receiver<OutboundFrame>,
        peers: HashMap<PublicKey, BloomActorHandle>,
        arrivals: mpsc::UnboundedSender<(PublicKey, PublicKey)>,
    ) {
        tokio::spawn(async move {
            while let Some(frame) = outbox.recv().await {
                match frame {
                    OutboundFrame::Bloom { peer, payload, .. } => {
                        if let Some(h) = peers.get(&peer) {
                            let _ = h.filter_received(from, payload).await;
                        }
                    }
                    OutboundFrame::Multicast { peer, packet, .. } => {
                        let _ = arrivals.send((from, peer));
                        let dest = PublicKey::from_bytes(&packet.0[..32]);
                        if let (Some(h), Some(dest)) = (peers.get(&peer), dest) {
                            if dest != peer {
                                let _ = h.send_multicast(from, dest, packet).await;
                            }
                        }
                    }
                }
            }
        });
    }

    fn wire(
        nodes: &mut HashMap<PublicKey, Node>,
    ) -> (
        HashMap<PublicKey, BloomActorHandle>,
        mpsc::UnboundedReceiver<(PublicKey, PublicKey)>,
    ) {
        let handles: HashMap<_, _> = nodes.iter().map(|(k, n)| (*k, n.handle.clone())).collect();
        let (arrivals_tx, arrivals_rx) = mpsc::unbounded_channel();

        for (me, node) in nodes.iter_mut() {
            let (_, placeholder) = mpsc::channel(1);
            let outbox = std::mem::replace(&mut node.outbox, placeholder);
            spawn_pump(*me, outbox, handles.clone(), arrivals_tx.clone());
        }
        (handles, arrivals_rx)
    }

    async fn wait_until<F>(handle: &BloomActorHandle, mut pred: F) -> Vec<PeerStatus>
    where
        F: FnMut(&[PeerStatus]) -> bool,
    {
        timeout(WAIT, async {
            loop {
                let status = handle.status().await.expect("actor alive");
                if pred(&status) {
                    return status;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition reached in time")
    }

    fn manual() -> MulticastConfig {
        MulticastConfigBuilder::new()
            .maintenance_interval_ms(0)
            .build()
            .unwrap()
    }

    async fn introduce(handles: &HashMap<PublicKey, BloomActorHandle>) {
        let (a, b, c) = (key(1), key(2), key(3));
        for (x, y) in [(a, b), (a, c), (b, a), (c, a)] {
            handles[&x].peer_known(y).await.unwrap();
        }
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_filters_flow_between_actors() {
        init_tracing();
        let config = manual();
        let mut nodes = star(&config);
        let (handles, _arrivals) = wire(&mut nodes);
        let (a, b, c) = (key(1), key(2), key(3));

        introduce(&handles).await;
        for h in handles.values() {
            h.run_maintenance().await.unwrap();
        }

        let status = wait_until(&handles[&a], |s| s.iter().all(|p| p.on_tree && p.recv_bits > 0)).await;
        assert_eq!(status.iter().map(|p| p.peer).collect::<Vec<_>>(), vec![b, c]);

        // B and C have heard from A.
        wait_until(&handles[&b], |s| s[0].recv_bits > 0).await;
        wait_until(&handles[&c], |s| s[0].recv_bits > 0).await;

        for h in handles.values() {
            h.shutdown().await.unwrap();
        }
        for node in nodes.into_values() {
            node.task.await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_multicast_relayed_through_root() {
        init_tracing();
        let config = manual();
        let mut nodes = star(&config);
        let (handles, mut arrivals) = wire(&mut nodes);
        let (a, b, c) = (key(1), key(2), key(3));

        introduce(&handles).await;
        for h in handles.values() {
            h.run_maintenance().await.unwrap();
        }
        wait_until(&handles[&a], |s| s.iter().all(|p| p.recv_bits > 0)).await;

        // A now knows both children; let it tell them about each other.
        handles[&a].run_maintenance().await.unwrap();
        // Status is sorted by peer: index 1 is C.
        let to_c_bits = wait_until(&handles[&a], |_| true).await[1].send_bits;
        wait_until(&handles[&c], |s| s[0].recv_bits >= to_c_bits).await;

        handles[&c]
            .send_multicast(c, b, sim_packet(&b, b"ping"))
            .await
            .unwrap();

        let first = timeout(WAIT, arrivals.recv()).await.unwrap().unwrap();
        let second = timeout(WAIT, arrivals.recv()).await.unwrap().unwrap();
        assert_eq!(first, (c, a));
        assert_eq!(second, (a, b));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_drives_convergence() {
        init_tracing();
        let config = MulticastConfigBuilder::new()
            .maintenance_interval_ms(50)
            .build()
            .unwrap();
        let mut nodes = star(&config);
        let (handles, _arrivals) = wire(&mut nodes);
        let a = key(1);

        introduce(&handles).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let status = handles[&a].status().await.unwrap();
        assert!(status.iter().all(|p| p.on_tree && p.recv_bits > 0));
    }

    #[tokio::test]
    async fn test_status_json_after_shutdown_fails_cleanly() {
        init_tracing();
        let config = manual();
        let mut nodes = star(&config);
        let a = key(1);
        let node = nodes.remove(&a).unwrap();

        let json = node.handle.status_json().await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array());
        node.handle.shutdown().await.unwrap();
        node.task.await.unwrap().unwrap();

        assert!(matches!(
            node.handle.status_json().await,
            Err(BloomError::ActorStopped)
        ));
    }
}
