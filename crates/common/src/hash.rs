//! Deterministic 256 bit content-identity tags.
//!
//! [`compute_hash`] stretches a single FNV-1a 64 value over 32 bytes. It is a pure function of
//! its input and stable across platforms, but it is NOT a cryptographic digest: collisions are
//! cheap to construct and callers that need collision resistance must not rely on it.

use crate::types::Hash;
use crate::types::HASH_LEN;

pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub fn fnv1a_64(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ *byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// h1 = fnv1a(data), h2 = h1 * P, h3 = h2 * P, h4 = h3 * P, output h1‖h2‖h3‖h4 little endian
#[cfg_attr(feature = "fuzzing", test_fuzz::test_fuzz)]
pub fn compute_hash(data: &[u8]) -> Hash {
    let mut out = [0_u8; HASH_LEN];
    let mut word = fnv1a_64(data);
    for chunk in out.chunks_exact_mut(8) {
        chunk.copy_from_slice(&word.to_le_bytes());
        word = word.wrapping_mul(FNV_PRIME);
    }
    Hash(out)
}
