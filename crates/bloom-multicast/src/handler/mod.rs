//! Handler Layer
//!
//! The single-writer actor that owns a membership service and serializes
//! every operation on it.

pub mod actor;

pub use actor::{BloomActor, BloomActorHandle};
