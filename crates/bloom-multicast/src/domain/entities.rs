//! # Core Domain Entities
//!
//! - [`PublicKey`]: stable 32-byte peer identity, also the Bloom insertion key
//! - [`LinkId`] / [`PeerLink`]: one transport-level link to a peer
//! - [`MulticastPacket`]: opaque multicast payload

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length in bytes of a peer public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Stable public identity of a node in the mesh.
///
/// Used both as the map key for per-peer state and, after the key
/// transform, as the element inserted into Bloom filters.
///
/// # Example
///
/// ```rust
/// use bloom_multicast::PublicKey;
///
/// let key = PublicKey::new([0xAB; 32]);
/// let same = PublicKey::from_bytes(&[0xAB; 32]).unwrap();
/// assert_eq!(key, same);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Creates a key from a 32-byte array.
    pub const fn new(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates a key from a byte slice.
    ///
    /// Returns `None` unless the slice is exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; PUBLIC_KEY_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    // Short form; full keys make log lines unreadable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// Identifier of a single transport link. One peer may have several.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// An open transport link to a peer, with its scheduling priority.
///
/// Lower `priority` values are preferred when forwarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerLink {
    pub id: LinkId,
    pub priority: u8,
}

impl PeerLink {
    pub fn new(id: u64, priority: u8) -> Self {
        Self {
            id: LinkId(id),
            priority,
        }
    }
}

/// Opaque multicast payload. The core never inspects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MulticastPacket(pub Vec<u8>);

impl MulticastPacket {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self(payload.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
