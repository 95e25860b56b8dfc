//! Events Layer
//!
//! Message types delivered to the membership actor.

pub mod commands;

pub use commands::{BloomCommand, TopologyChange};
