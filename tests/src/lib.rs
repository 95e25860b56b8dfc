//! # Bloom Multicast Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks (codec, aggregation, forwarding)
//! ├── integration/      # Multi-node scenarios
//! │   ├── scenarios.rs  # Synchronous mesh simulation
//! │   ├── actor_flow.rs # Actors wired through channel transports
//! │   └── properties.rs # Filter algebra properties
//! └── support.rs        # Tracing setup and the mesh simulator
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mc-tests
//!
//! # With logs
//! RUST_LOG=bloom_multicast=debug cargo test -p mc-tests -- --nocapture
//!
//! # Benchmarks
//! cargo bench -p mc-tests
//! ```

#![allow(dead_code)]

pub mod benchmarks;
