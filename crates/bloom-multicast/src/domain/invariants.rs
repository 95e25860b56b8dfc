//! Internal invariants of the membership bookkeeping.
//!
//! A violation here means local state is inconsistent (a bug), never that a
//! remote peer misbehaved. Callers abort the current operation.

use thiserror::Error;

use super::entities::PublicKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Encoder output length disagrees with the size estimator.
    #[error("encoded filter is {actual} bytes, estimator said {expected}")]
    EncodedSizeMismatch { expected: usize, actual: usize },

    /// A peer is on the tree but has no open link.
    #[error("on-tree peer {peer} has no open link")]
    OnTreePeerWithoutLinks { peer: PublicKey },

    /// An operation addressed a peer with no entry.
    #[error("no entry for peer {peer}")]
    UnknownPeer { peer: PublicKey },

    /// The routing snapshot lacks the local node's own parent.
    #[error("routing snapshot has no entry for the local node")]
    MissingLocalRoutingInfo,
}

/// Encoded size must match the estimate exactly.
pub fn check_encoded_size(expected: usize, actual: usize) -> Result<(), InvariantViolation> {
    if expected != actual {
        return Err(InvariantViolation::EncodedSizeMismatch { expected, actual });
    }
    Ok(())
}
