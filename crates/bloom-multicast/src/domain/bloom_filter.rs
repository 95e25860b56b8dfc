//! Fixed-size Bloom filter of transformed destination keys
//!
//! Every node in the mesh uses the same geometry (`BLOOM_BITS`,
//! `BLOOM_HASHES`), so filters from different peers can be unioned and
//! compared bit-for-bit.
//!
//! INVARIANTS:
//! - No false negatives: after `insert(k)`, `contains(k)` is true.
//! - Bits only grow through `insert`/`union_with`. Clearing happens by
//!   replacing the whole filter with `BloomFilter::new()`.

use std::fmt;

use bitvec::prelude::*;

use super::hash_functions::compute_hash_positions;

/// Bytes per flag block in the wire format (one bit per backing word).
pub const BLOOM_FLAG_BYTES: usize = 16;
/// Number of 64-bit words in the backing array.
pub const BLOOM_WORDS: usize = BLOOM_FLAG_BYTES * 8;
/// Bytes in the backing array.
pub const BLOOM_BYTES: usize = BLOOM_WORDS * 8;
/// Bits in the backing array (m).
pub const BLOOM_BITS: usize = BLOOM_BYTES * 8;
/// Hash functions per inserted key (k).
pub const BLOOM_HASHES: usize = 8;

type Bits = BitArray<[u64; BLOOM_WORDS], Lsb0>;

/// Probabilistic set of transformed destination keys.
///
/// Bit `i` lives in word `i / 64` at position `i % 64` (LSB first), which
/// is the word layout the wire codec flags and transmits.
#[derive(Clone)]
pub struct BloomFilter {
    bits: Bits,
}

impl BloomFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self {
            bits: Bits::new([0u64; BLOOM_WORDS]),
        }
    }

    /// Build a filter directly from backing words (used by the decoder).
    pub(crate) fn from_words(words: [u64; BLOOM_WORDS]) -> Self {
        Self {
            bits: Bits::new(words),
        }
    }

    /// Backing words in array order.
    pub fn words(&self) -> &[u64] {
        self.bits.as_raw_slice()
    }

    /// Insert a key. `contains(key)` is guaranteed true afterwards.
    pub fn insert(&mut self, key: &[u8]) {
        for pos in compute_hash_positions(key, BLOOM_HASHES, BLOOM_BITS) {
            self.bits.set(pos, true);
        }
    }

    /// Test if a key might be in the filter.
    ///
    /// - `true`: maybe present (could be a false positive)
    /// - `false`: definitely not present
    pub fn contains(&self, key: &[u8]) -> bool {
        compute_hash_positions(key, BLOOM_HASHES, BLOOM_BITS).all(|pos| self.bits[pos])
    }

    /// OR another filter into this one.
    ///
    /// Word-wise rather than bit-wise; both filters share one geometry.
    pub fn union_with(&mut self, other: &BloomFilter) {
        for (s, o) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *s |= *o;
        }
    }

    /// Number of one bits.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.words().iter().all(|w| *w == 0)
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.words() == other.words()
    }
}

impl Eq for BloomFilter {}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("bits_set", &self.bits_set())
            .field("encoded_len", &self.encoded_len())
            .finish()
    }
}
