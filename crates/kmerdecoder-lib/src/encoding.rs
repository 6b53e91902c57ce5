//! Symbol alphabets and packed encodings
//!
//! Nucleotides are packed 2 bits per base, most-significant base first, so
//! numeric order of packed codes equals lexicographic order of the text:
//! - A (65/97)  -> 00
//! - C (67/99)  -> 01
//! - G (71/103) -> 10
//! - T (84/116) -> 11
//!
//! With this layout the complement of a base is its bitwise NOT (`x ^ 0b11`).
//!
//! Amino acids are packed 5 bits per residue over the 20 standard residues,
//! in the order of [`AMINO_ACIDS`].

use crate::constants::{low_bits_mask, BITS_PER_BASE, BITS_PER_RESIDUE};

const INVALID: u8 = 0xFF;

/// 256-entry LUT: ASCII -> 2-bit code, `INVALID` for anything outside ACGT.
static BASE_LUT: [u8; 256] = {
    let mut t = [INVALID; 256];
    t[b'A' as usize] = 0;
    t[b'a' as usize] = 0;
    t[b'C' as usize] = 1;
    t[b'c' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'g' as usize] = 2;
    t[b'T' as usize] = 3;
    t[b't' as usize] = 3;
    t
};

/// The 20 standard amino acids, indexed by their 5-bit code
pub const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// 256-entry LUT: ASCII -> 5-bit residue code, `INVALID` for non-standard residues.
static RESIDUE_LUT: [u8; 256] = {
    let mut t = [INVALID; 256];
    let mut i = 0;
    while i < AMINO_ACIDS.len() {
        let upper = AMINO_ACIDS[i];
        t[upper as usize] = i as u8;
        t[upper.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    t
};

/// Encode a single nucleotide to 2 bits. `None` if ambiguous.
#[inline]
pub fn encode_base(base: u8) -> Option<u8> {
    let v = BASE_LUT[base as usize];
    if v <= 0b11 {
        Some(v)
    } else {
        None
    }
}

/// Decode a 2-bit value to an uppercase nucleotide
#[inline]
pub const fn decode_base(bits: u8) -> u8 {
    match bits & 0b11 {
        0b00 => b'A',
        0b01 => b'C',
        0b10 => b'G',
        _ => b'T',
    }
}

/// Whether `base` belongs to the ACGT alphabet (either case)
#[inline]
pub fn is_valid_base(base: u8) -> bool {
    BASE_LUT[base as usize] != INVALID
}

/// Complement of an uppercase or lowercase nucleotide; other bytes map to `N`.
#[inline]
pub const fn complement(base: u8) -> u8 {
    match base {
        b'A' | b'a' => b'T',
        b'C' | b'c' => b'G',
        b'G' | b'g' => b'C',
        b'T' | b't' => b'A',
        _ => b'N',
    }
}

/// Reverse complement of a nucleotide string (uppercase output)
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Mask covering a packed nucleotide k-mer
#[inline]
pub const fn kmer_mask(k: usize) -> u64 {
    low_bits_mask(k * BITS_PER_BASE)
}

/// Pack a nucleotide window into a `u64`, first base in the highest bits.
///
/// Returns `None` if the window is longer than 32 bases or contains a
/// base outside ACGT.
#[inline]
pub fn pack_bases(window: &[u8]) -> Option<u64> {
    if window.len() * BITS_PER_BASE > 64 {
        return None;
    }
    let mut code = 0u64;
    for &b in window {
        code = (code << BITS_PER_BASE) | encode_base(b)? as u64;
    }
    Some(code)
}

/// Unpack a `k`-base code produced by [`pack_bases`]
pub fn unpack_bases(code: u64, k: usize) -> String {
    (0..k)
        .map(|i| {
            let shift = (k - 1 - i) * BITS_PER_BASE;
            decode_base(((code >> shift) & 0b11) as u8) as char
        })
        .collect()
}

/// Reverse complement of a packed `k`-base code
///
/// Uses bit-parallel operations: complement via XOR, then reverse 2-bit pairs.
#[inline]
pub fn reverse_complement_packed(code: u64, k: usize) -> u64 {
    debug_assert!(k >= 1 && k <= 32);
    // Complement: all-ones XOR flips A<->T, C<->G. Padding bits become ones
    // and are shifted out below.
    let mut x = !code;
    // Swap adjacent 2-bit pairs, then nibbles, then bytes
    x = ((x >> 2) & 0x3333_3333_3333_3333u64) | ((x & 0x3333_3333_3333_3333u64) << 2);
    x = ((x >> 4) & 0x0F0F_0F0F_0F0F_0F0Fu64) | ((x & 0x0F0F_0F0F_0F0F_0F0Fu64) << 4);
    x = x.swap_bytes();
    x >> (64 - k * BITS_PER_BASE)
}

/// Smaller of a packed code and its reverse complement
#[inline]
pub fn canonical_packed(code: u64, k: usize) -> u64 {
    code.min(reverse_complement_packed(code, k))
}

/// Encode a single amino acid to 5 bits. `None` for non-standard residues.
#[inline]
pub fn encode_residue(residue: u8) -> Option<u8> {
    let v = RESIDUE_LUT[residue as usize];
    if v != INVALID {
        Some(v)
    } else {
        None
    }
}

/// Whether `residue` is one of the 20 standard amino acids (either case)
#[inline]
pub fn is_valid_residue(residue: u8) -> bool {
    RESIDUE_LUT[residue as usize] != INVALID
}

/// Pack an amino-acid window, first residue in the highest bits.
pub fn pack_residues(window: &[u8]) -> Option<u64> {
    if window.len() * BITS_PER_RESIDUE > 64 {
        return None;
    }
    let mut code = 0u64;
    for &r in window {
        code = (code << BITS_PER_RESIDUE) | encode_residue(r)? as u64;
    }
    Some(code)
}

/// Unpack a `k`-residue code produced by [`pack_residues`]
///
/// Returns `None` if some 5-bit group is not a residue code.
pub fn unpack_residues(code: u64, k: usize) -> Option<String> {
    let mask = low_bits_mask(BITS_PER_RESIDUE);
    (0..k)
        .map(|i| {
            let shift = (k - 1 - i) * BITS_PER_RESIDUE;
            let idx = ((code >> shift) & mask) as usize;
            AMINO_ACIDS.get(idx).map(|&r| r as char)
        })
        .collect()
}
