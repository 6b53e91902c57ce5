//! Hash primitives behind the hashing strategies.
//!
//! - [`IntegerMix`]: Thomas Wang style 64-bit mix restricted to a bit mask.
//!   Every step is a bijection modulo `2^bits`, so the mix can be undone.
//! - [`DeterministicHasher`]: AHasher with explicit seeds, for strings of
//!   any length.

use ahash::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Multiplicative inverse of an odd number modulo 2^64 (Newton iteration)
const fn mod_inverse(a: u64) -> u64 {
    // a * a == 1 (mod 8) for odd a; every round doubles the correct bits
    let mut inv = a;
    let mut i = 0;
    while i < 5 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(a.wrapping_mul(inv)));
        i += 1;
    }
    inv
}

const MUL_21_BITS: u64 = (1 << 21) - 1;
const MUL_265: u64 = 265;
const MUL_21: u64 = 21;
const MUL_31_BITS: u64 = (1 << 31) + 1;

const INV_21_BITS: u64 = mod_inverse(MUL_21_BITS);
const INV_265: u64 = mod_inverse(MUL_265);
const INV_21: u64 = mod_inverse(MUL_21);
const INV_31_BITS: u64 = mod_inverse(MUL_31_BITS);

/// Undo `x ^= x >> shift` for a value confined to the low bits
#[inline]
fn unxorshift(y: u64, shift: u32) -> u64 {
    let mut x = y;
    for _ in 0..(64 / shift + 1) {
        x = y ^ (x >> shift);
    }
    x
}

/// Invertible integer mix over the low bits selected by a mask
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerMix {
    mask: u64,
}

impl IntegerMix {
    /// Create a mix confined to `mask` (must be of the form `2^b - 1`)
    pub fn new(mask: u64) -> Self {
        debug_assert!(mask & mask.wrapping_add(1) == 0);
        Self { mask }
    }

    /// The mask the mix works under
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Forward mix
    #[inline]
    pub fn hash(&self, key: u64) -> u64 {
        let mask = self.mask;
        let mut key = key & mask;
        key = key.wrapping_mul(MUL_21_BITS).wrapping_sub(1) & mask; // (key << 21) - key - 1
        key ^= key >> 24;
        key = key.wrapping_mul(MUL_265) & mask;
        key ^= key >> 14;
        key = key.wrapping_mul(MUL_21) & mask;
        key ^= key >> 28;
        key = key.wrapping_mul(MUL_31_BITS) & mask; // key + (key << 31)
        key
    }

    /// Inverse mix: `unhash(hash(x)) == x & mask`
    #[inline]
    pub fn unhash(&self, key: u64) -> u64 {
        let mask = self.mask;
        let mut key = key & mask;
        key = key.wrapping_mul(INV_31_BITS) & mask;
        key = unxorshift(key, 28);
        key = key.wrapping_mul(INV_21) & mask;
        key = unxorshift(key, 14);
        key = key.wrapping_mul(INV_265) & mask;
        key = unxorshift(key, 24);
        key = key.wrapping_add(1).wrapping_mul(INV_21_BITS) & mask;
        key
    }
}

/// A deterministic hasher with a seeded state
#[derive(Clone)]
pub struct DeterministicHasher {
    seeds: [u64; 4],
    state: RandomState,
}

impl DeterministicHasher {
    /// Create a new deterministic hasher with the given seeds
    pub fn new(seeds: [u64; 4]) -> Self {
        let state = RandomState::with_seeds(seeds[0], seeds[1], seeds[2], seeds[3]);
        Self { seeds, state }
    }

    /// Hash a byte string using a seeded AHasher
    #[inline]
    pub fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        let mut hasher = self.state.build_hasher();
        hasher.write(bytes);
        hasher.finish()
    }

    /// Get the seed values
    pub fn seeds(&self) -> [u64; 4] {
        self.seeds
    }
}

impl std::fmt::Debug for DeterministicHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeterministicHasher")
            .field("seeds", &self.seeds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::low_bits_mask;

    #[test]
    fn test_mod_inverse() {
        for &a in &[MUL_21_BITS, MUL_265, MUL_21, MUL_31_BITS, 3, 0xdead_beef_u64 | 1] {
            assert_eq!(a.wrapping_mul(mod_inverse(a)), 1, "a={}", a);
        }
    }

    #[test]
    fn test_unxorshift() {
        for &s in &[14u32, 24, 28] {
            let x = 0x0123_4567_89ab_cdefu64;
            assert_eq!(unxorshift(x ^ (x >> s), s), x);
        }
    }

    #[test]
    fn test_integer_mix_inverts_within_mask() {
        for bits in [2usize, 10, 42, 62, 64] {
            let mix = IntegerMix::new(low_bits_mask(bits));
            for value in [0u64, 1, 2, 0x1234_5678, u64::MAX, 0xaaaa_5555_aaaa_5555] {
                let value = value & mix.mask();
                let hashed = mix.hash(value);
                assert!(hashed <= mix.mask());
                assert_eq!(mix.unhash(hashed), value, "bits={} value={}", bits, value);
            }
        }
    }

    #[test]
    fn test_integer_mix_scrambles() {
        let mix = IntegerMix::new(low_bits_mask(42));
        assert_ne!(mix.hash(1), 1);
        assert_ne!(mix.hash(1), mix.hash(2));
    }

    #[test]
    fn test_deterministic_hashing() {
        let hasher1 = DeterministicHasher::new([1, 2, 3, 4]);
        let hasher2 = DeterministicHasher::new([1, 2, 3, 4]);
        let hasher3 = DeterministicHasher::new([5, 6, 7, 8]);

        let value = b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT";

        // Same seeds should produce same hash
        assert_eq!(hasher1.hash_bytes(value), hasher2.hash_bytes(value));

        // Different seeds should produce different hash
        assert_ne!(hasher1.hash_bytes(value), hasher3.hash_bytes(value));
    }
}
