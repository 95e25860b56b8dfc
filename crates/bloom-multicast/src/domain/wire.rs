//! Compact wire encoding for [`BloomFilter`]
//!
//! ```text
//! [zero_flags: 16][one_flags: 16][word: 8]*
//! ```
//!
//! One flag bit per backing word, MSB first (word `i` is byte `i / 8`,
//! mask `0x80 >> (i % 8)`). A word flagged in `zero_flags` is all zeros, in
//! `one_flags` all ones. Every unflagged word follows as a big-endian `u64`,
//! in array order. Sparse filters are mostly zero words, so a typical
//! filter costs 32 bytes plus a few words.

use super::bloom_filter::{BloomFilter, BLOOM_FLAG_BYTES, BLOOM_WORDS};
use super::invariants::{check_encoded_size, InvariantViolation};
use crate::error::DecodeError;

const WORD_BYTES: usize = 8;

#[inline]
fn flag_mask(word: usize) -> (usize, u8) {
    (word / 8, 0x80 >> (word % 8))
}

#[inline]
fn is_trivial(word: u64) -> bool {
    word == 0 || word == u64::MAX
}

impl BloomFilter {
    /// Exact number of bytes [`encode`](Self::encode) will produce.
    pub fn encoded_len(&self) -> usize {
        let raw_words = self.words().iter().filter(|w| !is_trivial(**w)).count();
        2 * BLOOM_FLAG_BYTES + WORD_BYTES * raw_words
    }

    /// Append the encoded filter to `out`.
    ///
    /// Fails only if the output length disagrees with
    /// [`encoded_len`](Self::encoded_len), which would be a local bug.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), InvariantViolation> {
        let expected = self.encoded_len();
        let start = out.len();
        out.reserve(expected);

        let mut zero_flags = [0u8; BLOOM_FLAG_BYTES];
        let mut one_flags = [0u8; BLOOM_FLAG_BYTES];
        for (idx, word) in self.words().iter().enumerate() {
            let (byte, mask) = flag_mask(idx);
            if *word == 0 {
                zero_flags[byte] |= mask;
            } else if *word == u64::MAX {
                one_flags[byte] |= mask;
            }
        }
        out.extend_from_slice(&zero_flags);
        out.extend_from_slice(&one_flags);

        for word in self.words().iter().filter(|w| !is_trivial(**w)) {
            out.extend_from_slice(&word.to_be_bytes());
        }

        check_encoded_size(expected, out.len() - start)
    }

    /// Encode into a fresh buffer sized by the estimator.
    pub fn encode(&self) -> Result<Vec<u8>, InvariantViolation> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Decode a filter. All or nothing: on error no filter is produced.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let flags_len = 2 * BLOOM_FLAG_BYTES;
        if data.len() < flags_len {
            return Err(DecodeError::TruncatedFlags {
                expected: flags_len,
                actual: data.len(),
            });
        }
        let (zero_flags, rest) = data.split_at(BLOOM_FLAG_BYTES);
        let (one_flags, mut tail) = rest.split_at(BLOOM_FLAG_BYTES);

        let mut words = [0u64; BLOOM_WORDS];
        for (idx, slot) in words.iter_mut().enumerate() {
            let (byte, mask) = flag_mask(idx);
            let zero = zero_flags[byte] & mask != 0;
            let one = one_flags[byte] & mask != 0;

            *slot = match (zero, one) {
                (true, true) => return Err(DecodeError::ConflictingFlags { word: idx }),
                (true, false) => 0,
                (false, true) => u64::MAX,
                (false, false) => {
                    let Some((chunk, remaining)) = tail.split_first_chunk::<WORD_BYTES>() else {
                        return Err(DecodeError::TruncatedWords {
                            word: idx,
                            remaining: tail.len(),
                        });
                    };
                    tail = remaining;
                    u64::from_be_bytes(*chunk)
                }
            };
        }

        if !tail.is_empty() {
            return Err(DecodeError::TrailingBytes { count: tail.len() });
        }

        Ok(BloomFilter::from_words(words))
    }
}
