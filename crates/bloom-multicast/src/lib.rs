//! # Bloom Multicast
//!
//! Multicast membership over a spanning tree. Each node keeps, per
//! neighbouring peer, a fixed-size Bloom filter of the destination keys that
//! peer's subtree wants traffic for, merges those filters up and down the
//! tree, and uses them to decide which links a multicast packet is copied
//! onto.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: 8192-bit filter, K = 8, with its compact wire codec
//!   - `PeerTable` / `PeerBloomEntry`: per-peer send/recv state
//!   - `TreeMembershipTracker`: on-tree recomputation
//!   - `BloomAggregator`: outgoing filter with anti-flap retention
//!   - `MulticastForwarder`: per-packet target selection
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipApi`: driving port
//!   - `RoutingStateProvider`, `PeerTransport`, `KeyTransform`, `EventSink`:
//!     driven ports
//!
//! - **Service Layer** (`service/`): `BloomMembershipService`
//!
//! - **Handler Layer** (`handler/`): `BloomActor`, the single writer
//!
//! - **Events Layer** (`events/`): queued `BloomCommand`s
//!
//! - **Adapters Layer** (`adapters/`): in-memory routing table, channel
//!   transport, event sinks
//!
//! ## Invariants
//!
//! - A filter sent to peer P never includes P's own received filter.
//! - `encoded_len()` equals the length of `encode()` for every filter.
//! - Malformed remote input is rejected whole and never reaches the
//!   invariant-violation path.
//! - An invariant violation aborts the operation before anything is sent.
//!
//! ## Usage Example
//!
//! ```rust
//! use bloom_multicast::BloomFilter;
//!
//! let mut filter = BloomFilter::new();
//! filter.insert(b"destination key");
//!
//! let bytes = filter.encode().unwrap();
//! assert_eq!(bytes.len(), filter.encoded_len());
//!
//! let decoded = BloomFilter::decode(&bytes).unwrap();
//! assert!(decoded.contains(b"destination key"));
//! ```
//!
//! ## Wiring
//!
//! ```ignore
//! use bloom_multicast::{
//!     BloomActor, BloomMembershipService, ChannelTransport, InMemoryRoutingTable,
//!     MulticastConfig, TracingEventSink,
//! };
//! use std::sync::Arc;
//!
//! let config = MulticastConfig::from_toml_str(&std::fs::read_to_string("multicast.toml")?)?;
//! let routing = Arc::new(InMemoryRoutingTable::new(local_key));
//! let (transport, frames) = ChannelTransport::new(1024);
//!
//! let service = BloomMembershipService::new(local_key, config.clone(), routing, Arc::new(transport))
//!     .with_event_sink(Arc::new(TracingEventSink));
//! let (handle, task) = BloomActor::spawn(service, &config);
//!
//! handle.peer_known(peer_key).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod events;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{
    ChannelTransport, InMemoryRoutingTable, OutboundFrame, RecordingEventSink, TracingEventSink,
};
pub use domain::{
    BloomAggregator, BloomFilter, ForwardPlan, ForwardTarget, LinkId, MulticastConfig,
    MulticastConfigBuilder, MulticastForwarder, MulticastPacket, PeerBloomEntry, PeerLink,
    PeerStatus, PeerTable, PublicKey, RoutingSnapshot, TreeMembershipTracker,
};
pub use error::{BloomError, ConfigError, DecodeError, InvariantViolation, TransportError};
pub use events::{BloomCommand, TopologyChange};
pub use handler::{BloomActor, BloomActorHandle};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{
    BloomEvent, EventSink, IdentityTransform, KeyTransform, MaintenanceReport, MembershipApi,
    NoOpEventSink, PeerTransport, RoutingStateProvider,
};
pub use service::BloomMembershipService;
