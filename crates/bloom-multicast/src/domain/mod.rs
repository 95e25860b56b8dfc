//! Domain Layer - Pure business logic
//!
//! - Fixed-size Bloom filter and its wire codec
//! - Per-peer filter state
//! - Tree membership, aggregation and forwarding decisions
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod aggregator;
pub mod bloom_filter;
pub mod config;
pub mod entities;
pub mod forwarder;
pub mod hash_functions;
pub mod invariants;
pub mod peer_entry;
pub mod routing;
pub mod tree;
pub mod wire;

pub use aggregator::BloomAggregator;
pub use bloom_filter::{
    BloomFilter, BLOOM_BITS, BLOOM_BYTES, BLOOM_FLAG_BYTES, BLOOM_HASHES, BLOOM_WORDS,
};
pub use config::{MulticastConfig, MulticastConfigBuilder, MAX_RETENTION_CYCLES};
pub use entities::{LinkId, MulticastPacket, PeerLink, PublicKey, PUBLIC_KEY_LEN};
pub use forwarder::{ForwardPlan, ForwardTarget, MulticastForwarder};
pub use invariants::InvariantViolation;
pub use peer_entry::{PeerBloomEntry, PeerStatus, PeerTable};
pub use routing::RoutingSnapshot;
pub use tree::TreeMembershipTracker;
