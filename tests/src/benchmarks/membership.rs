//! # Membership Benchmarks
//!
//! A root with N children, each announcing a handful of keys:
//! - maintenance pass cost with everything unchanged (steady state)
//! - maintenance pass cost when every child's interest just changed
//! - per-packet target selection

use std::sync::Arc;

use bloom_multicast::{
    BloomFilter, BloomMembershipService, ChannelTransport, InMemoryRoutingTable, MembershipApi,
    MulticastConfig, MulticastPacket, OutboundFrame, PeerLink, PublicKey,
};
use criterion::{black_box, BatchSize, BenchmarkId, Criterion};
use tokio::sync::mpsc;

use crate::support::random_keys;

struct Star {
    service: BloomMembershipService,
    children: Vec<PublicKey>,
    interests: Vec<Vec<u8>>,
    rx: mpsc::Receiver<OutboundFrame>,
}

impl Star {
    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

fn star(children: usize, keys_per_child: usize) -> Star {
    let root = PublicKey::new([0; 32]);
    let kids = random_keys(children);

    let routing = Arc::new(InMemoryRoutingTable::new(root));
    for (i, kid) in kids.iter().enumerate() {
        routing.set_parent(*kid, root);
        routing.add_link(*kid, PeerLink::new(i as u64, 0));
    }
    let (transport, rx) = ChannelTransport::new(children * 4 + 16);
    let mut service =
        BloomMembershipService::new(root, MulticastConfig::default(), routing, Arc::new(transport));

    let mut interests = Vec::with_capacity(children);
    for kid in &kids {
        service.add_peer(*kid);
        let mut f = BloomFilter::new();
        f.insert(kid.as_ref());
        for k in random_keys(keys_per_child) {
            f.insert(k.as_ref());
        }
        let bytes = f.encode().expect("encodes");
        service.handle_bloom(kid, &bytes).expect("valid filter");
        interests.push(bytes);
    }

    let mut star = Star {
        service,
        children: kids,
        interests,
        rx,
    };
    star.service.do_maintenance().expect("maintenance");
    star.drain();
    star
}

pub fn bench_maintenance(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership/maintenance");

    for children in [4, 16, 64] {
        let mut s = star(children, 16);
        group.bench_function(BenchmarkId::new("steady_state", children), |b| {
            b.iter(|| black_box(s.service.do_maintenance().expect("maintenance")))
        });

        group.bench_function(BenchmarkId::new("all_changed", children), |b| {
            b.iter_batched(
                || {
                    let mut fresh = star(children, 16);
                    let kids = fresh.children.clone();
                    for (kid, bytes) in kids.iter().zip(fresh.interests.clone()) {
                        let mut f = BloomFilter::decode(&bytes).expect("decodes");
                        f.insert(&[kid.as_bytes()[0]; 7]);
                        let updated = f.encode().expect("encodes");
                        fresh.service.handle_bloom(kid, &updated).expect("valid");
                    }
                    fresh
                },
                |mut fresh| {
                    let report = fresh.service.do_maintenance().expect("maintenance");
                    fresh.drain();
                    black_box(report)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

pub fn bench_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership/forwarding");

    for children in [4, 16, 64] {
        let mut s = star(children, 16);
        let hit = s.children[children / 2];
        let miss = random_keys(1)[0];
        let packet = MulticastPacket::new(vec![0u8; 256]);

        group.bench_function(BenchmarkId::new("hit", children), |b| {
            b.iter(|| {
                let sent = s
                    .service
                    .send_local_multicast(&hit, packet.clone())
                    .expect("forwarded");
                s.drain();
                black_box(sent)
            })
        });

        group.bench_function(BenchmarkId::new("miss", children), |b| {
            b.iter(|| {
                black_box(
                    s.service
                        .send_local_multicast(&miss, packet.clone())
                        .expect("suppressed"),
                )
            })
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_maintenance(c);
    bench_forwarding(c);
}
