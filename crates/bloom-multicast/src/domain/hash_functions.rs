//! Hash functions for the membership filter
//!
//! MurmurHash3 (x64, 128-bit) with two seeds, combined by double hashing
//! into `k` bit positions.

use std::io::Cursor;

/// Hash an element with MurmurHash3 under the given seed.
///
/// Returns the lower 64 bits of the 128-bit digest.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    // Reading from an in-memory cursor cannot fail.
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Compute `k` bit positions in `[0, m)` for an element.
///
/// Double hashing: `h(i) = h1 + i * h2`. Deterministic across processes,
/// which the wire format depends on: two nodes must set the same bits for
/// the same key.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);
    let m = m as u64;

    (0..k as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}
