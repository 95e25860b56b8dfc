//! Error types for the multicast membership subsystem
//!
//! Two failure classes:
//! - [`DecodeError`]: a remote peer sent malformed bytes. The update is
//!   dropped and nothing local changes.
//! - [`InvariantViolation`]: local bookkeeping is inconsistent. The
//!   operation aborts before anything is sent.

use thiserror::Error;

use crate::domain::{LinkId, PublicKey};
pub use crate::domain::InvariantViolation;

/// Malformed filter bytes received from a peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Truncated flag block: need {expected} bytes, got {actual}")]
    TruncatedFlags { expected: usize, actual: usize },

    #[error("Word {word} is flagged both all-zero and all-one")]
    ConflictingFlags { word: usize },

    #[error("Missing data for word {word}: {remaining} bytes left, need 8")]
    TruncatedWords { word: usize, remaining: usize },

    #[error("Trailing bytes after last word: {count}")]
    TrailingBytes { count: usize },
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Retention window too large: {cycles} > {max}")]
    RetentionTooLarge { cycles: u32, max: u32 },

    #[error("Command queue capacity cannot be 0")]
    ZeroQueueCapacity,

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure reported by the transport port.
///
/// Never retried here; the transport owns retry and drop policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Link {link} to {peer} is closed")]
    LinkClosed { peer: PublicKey, link: LinkId },

    #[error("Send queue full for {peer}")]
    QueueFull { peer: PublicKey },
}

/// Errors surfaced by the service and the actor.
#[derive(Debug, Error)]
pub enum BloomError {
    #[error("Malformed filter from {peer}: {source}")]
    Decode {
        peer: PublicKey,
        #[source]
        source: DecodeError,
    },

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to serialize status: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Membership actor has stopped")]
    ActorStopped,
}

impl BloomError {
    /// True for errors that indicate a local bug rather than a remote fault.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BloomError::Invariant(_))
    }
}
