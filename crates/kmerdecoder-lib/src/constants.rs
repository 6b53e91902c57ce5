//! Constants and limits for the k-mer decoder
//!
//! This module defines the fixed seeds baked into the irreversible hash
//! strategies and the pattern-length limits of the packed encodings.

/// Seed of the Murmur strategy
pub const MURMUR_SEED: u64 = 2_038_074_761;

/// Seeds of the BigKmer byte hasher
pub const BIG_KMER_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Bits used per nucleotide in the packed encodings
pub const BITS_PER_BASE: usize = 2;

/// Bits used per residue in the amino-acid encoding
pub const BITS_PER_RESIDUE: usize = 5;

/// Longest k-mer that 2-bit packing fits into a 64-bit code
pub const MAX_PACKED_K: usize = 64 / BITS_PER_BASE;

/// Longest amino-acid k-mer that 5-bit packing fits into a 64-bit code
pub const MAX_AMINO_ACID_K: usize = 11;

/// Reading frames scanned by skip-mers when no ORF is given
pub const ALL_READING_FRAMES: [usize; 3] = [0, 1, 2];

/// Default number of records per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Version number
pub const VERSION: (u8, u8, u8) = (0, 1, 0);

/// Mask covering the low `bits` bits of a 64-bit code
#[inline]
pub const fn low_bits_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
