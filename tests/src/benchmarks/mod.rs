//! # Bloom Multicast Benchmarks
//!
//! Criterion benchmarks for the hot paths: filter codec, maintenance
//! passes, and per-packet target selection.

pub mod codec;
pub mod membership;
