//! Hashing strategies: fixed-length symbol strings to 64-bit codes
//!
//! | Mode      | Selector | Reversible | Canonical flag | k range   |
//! |-----------|----------|------------|----------------|-----------|
//! | Murmur    | 0        | no         | ignored        | any       |
//! | Integer   | 1        | yes        | honoured       | 1..=32    |
//! | TwoBits   | 2        | yes        | honoured       | 1..=32    |
//! | BigKmer   | 3        | no         | ignored        | any       |
//! | AminoAcid | -        | yes        | ignored        | 1..=11    |
//!
//! Integer and TwoBits share the 2-bit packing of [`crate::encoding`]. In
//! canonical mode the smaller of the forward and reverse-complement packings
//! is kept, so a k-mer and its reverse complement always get the same code.
//! TwoBits returns that packing as is; Integer additionally passes it
//! through an invertible [`IntegerMix`].
//!
//! Decoding a canonical code yields the canonical strand representative,
//! not necessarily the orientation that was encoded.

use crate::constants::{
    low_bits_mask, BIG_KMER_SEEDS, BITS_PER_RESIDUE, MAX_AMINO_ACID_K, MAX_PACKED_K, MURMUR_SEED,
};
use crate::encoding::{
    canonical_packed, encode_base, encode_residue, is_valid_base, is_valid_residue, kmer_mask,
    unpack_bases, unpack_residues,
};
use crate::error::{DecoderError, Result};
use crate::hasher::{DeterministicHasher, IntegerMix};
use murmurhash64::murmur_hash64a;
use std::fmt;

/// Selector of a hashing strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashMode {
    /// Seeded MurmurHash64A of the text (irreversible)
    Murmur,
    /// Mixed 2-bit packing (reversible)
    Integer,
    /// Raw 2-bit packing (reversible)
    TwoBits,
    /// Seeded generic string hash, no length limit (irreversible)
    BigKmer,
    /// 5-bit amino-acid packing (reversible)
    AminoAcid,
}

impl HashMode {
    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            HashMode::Murmur => "Murmur",
            HashMode::Integer => "Integer",
            HashMode::TwoBits => "TwoBits",
            HashMode::BigKmer => "BigKmer",
            HashMode::AminoAcid => "AminoAcid",
        }
    }

    /// Numeric selector of the nucleotide modes; `None` for amino acids
    pub const fn selector(self) -> Option<i32> {
        match self {
            HashMode::Murmur => Some(0),
            HashMode::Integer => Some(1),
            HashMode::TwoBits => Some(2),
            HashMode::BigKmer => Some(3),
            HashMode::AminoAcid => None,
        }
    }

    /// Whether codes of this mode can be decoded back to text
    pub const fn is_reversible(self) -> bool {
        matches!(self, HashMode::Integer | HashMode::TwoBits | HashMode::AminoAcid)
    }

    /// Whether this mode encodes amino acids rather than nucleotides
    pub const fn is_protein(self) -> bool {
        matches!(self, HashMode::AminoAcid)
    }
}

impl TryFrom<i32> for HashMode {
    type Error = DecoderError;

    fn try_from(selector: i32) -> Result<Self> {
        match selector {
            0 => Ok(HashMode::Murmur),
            1 => Ok(HashMode::Integer),
            2 => Ok(HashMode::TwoBits),
            3 => Ok(HashMode::BigKmer),
            other => Err(DecoderError::UnsupportedHashMode(other)),
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured hashing strategy for patterns of length `k`
#[derive(Clone, Debug)]
pub enum HashStrategy {
    /// See [`HashMode::Murmur`]
    Murmur {
        /// Pattern length
        k: usize,
        /// Seed of the hash function
        seed: u64,
    },
    /// See [`HashMode::Integer`]
    Integer {
        /// Pattern length
        k: usize,
        /// Keep the smaller of both strands
        canonical: bool,
        /// Mix applied to the packing
        mix: IntegerMix,
    },
    /// See [`HashMode::TwoBits`]
    TwoBits {
        /// Pattern length
        k: usize,
        /// Keep the smaller of both strands
        canonical: bool,
    },
    /// See [`HashMode::BigKmer`]
    BigKmer {
        /// Pattern length
        k: usize,
        /// Seeded string hasher
        hasher: DeterministicHasher,
    },
    /// See [`HashMode::AminoAcid`]
    AminoAcid {
        /// Pattern length
        k: usize,
    },
}

fn check_packed_k(k: usize) -> Result<()> {
    if k == 0 || k > MAX_PACKED_K {
        return Err(DecoderError::InvalidKmerSize { k, max: MAX_PACKED_K });
    }
    Ok(())
}

fn check_nonzero_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(DecoderError::EmptyPattern);
    }
    Ok(())
}

/// Pack bases already known to be in ACGT
#[inline]
fn pack_valid_bases(text: &[u8]) -> u64 {
    debug_assert!(text.iter().all(|&b| is_valid_base(b)));
    text.iter()
        .fold(0u64, |code, &b| (code << 2) | encode_base(b).unwrap_or(0) as u64)
}

/// Pack residues already known to be standard amino acids
#[inline]
fn pack_valid_residues(text: &[u8]) -> u64 {
    debug_assert!(text.iter().all(|&r| is_valid_residue(r)));
    text.iter().fold(0u64, |code, &r| {
        (code << BITS_PER_RESIDUE) | encode_residue(r).unwrap_or(0) as u64
    })
}

impl HashStrategy {
    /// Build the strategy selected by `mode` for patterns of length `k`
    ///
    /// `canonical` only affects [`HashMode::Integer`] and [`HashMode::TwoBits`].
    ///
    /// # Errors
    /// Returns an error if `k` is outside the range the mode supports.
    pub fn new(mode: HashMode, k: usize, canonical: bool) -> Result<Self> {
        match mode {
            HashMode::Murmur => Self::murmur(k),
            HashMode::Integer => Self::integer(k, canonical),
            HashMode::TwoBits => Self::two_bits(k, canonical),
            HashMode::BigKmer => Self::big_kmer(k),
            HashMode::AminoAcid => Self::amino_acid(k),
        }
    }

    /// Murmur strategy with the fixed seed
    pub fn murmur(k: usize) -> Result<Self> {
        check_nonzero_k(k)?;
        Ok(HashStrategy::Murmur { k, seed: MURMUR_SEED })
    }

    /// Integer strategy; `k` must fit the 2-bit packing
    pub fn integer(k: usize, canonical: bool) -> Result<Self> {
        check_packed_k(k)?;
        Ok(HashStrategy::Integer {
            k,
            canonical,
            mix: IntegerMix::new(kmer_mask(k)),
        })
    }

    /// TwoBits strategy; `k` must fit the 2-bit packing
    pub fn two_bits(k: usize, canonical: bool) -> Result<Self> {
        check_packed_k(k)?;
        Ok(HashStrategy::TwoBits { k, canonical })
    }

    /// BigKmer strategy with the fixed seeds
    pub fn big_kmer(k: usize) -> Result<Self> {
        check_nonzero_k(k)?;
        Ok(HashStrategy::BigKmer {
            k,
            hasher: DeterministicHasher::new(BIG_KMER_SEEDS),
        })
    }

    /// Amino-acid strategy
    ///
    /// # Errors
    /// Rejects `k > 11` with [`DecoderError::AminoAcidKmerTooLong`].
    pub fn amino_acid(k: usize) -> Result<Self> {
        if k > MAX_AMINO_ACID_K {
            return Err(DecoderError::AminoAcidKmerTooLong(k));
        }
        check_nonzero_k(k)?;
        Ok(HashStrategy::AminoAcid { k })
    }

    /// The mode this strategy implements
    pub fn mode(&self) -> HashMode {
        match self {
            HashStrategy::Murmur { .. } => HashMode::Murmur,
            HashStrategy::Integer { .. } => HashMode::Integer,
            HashStrategy::TwoBits { .. } => HashMode::TwoBits,
            HashStrategy::BigKmer { .. } => HashMode::BigKmer,
            HashStrategy::AminoAcid { .. } => HashMode::AminoAcid,
        }
    }

    /// Pattern length
    pub fn k(&self) -> usize {
        match *self {
            HashStrategy::Murmur { k, .. }
            | HashStrategy::Integer { k, .. }
            | HashStrategy::TwoBits { k, .. }
            | HashStrategy::BigKmer { k, .. }
            | HashStrategy::AminoAcid { k } => k,
        }
    }

    /// Whether codes are strand-independent
    pub fn canonical(&self) -> bool {
        match *self {
            HashStrategy::Integer { canonical, .. } | HashStrategy::TwoBits { canonical, .. } => {
                canonical
            }
            _ => false,
        }
    }

    /// Whether [`decode`](Self::decode) is supported
    pub fn is_reversible(&self) -> bool {
        self.mode().is_reversible()
    }

    /// Whether `symbol` belongs to the alphabet this strategy encodes
    #[inline]
    pub fn accepts(&self, symbol: u8) -> bool {
        match self {
            HashStrategy::AminoAcid { .. } => is_valid_residue(symbol),
            _ => is_valid_base(symbol),
        }
    }

    /// Encode an uppercase pattern of length `k` over the strategy alphabet
    ///
    /// Slicers only hand over windows that satisfy this; use
    /// [`try_encode`](Self::try_encode) for unchecked input.
    #[inline]
    pub fn encode(&self, text: &[u8]) -> u64 {
        debug_assert_eq!(text.len(), self.k());
        match self {
            HashStrategy::Murmur { seed, .. } => murmur_hash64a(text, *seed),
            HashStrategy::Integer { k, canonical, mix } => {
                let mut code = pack_valid_bases(text);
                if *canonical {
                    code = canonical_packed(code, *k);
                }
                mix.hash(code)
            }
            HashStrategy::TwoBits { k, canonical } => {
                let code = pack_valid_bases(text);
                if *canonical {
                    canonical_packed(code, *k)
                } else {
                    code
                }
            }
            HashStrategy::BigKmer { hasher, .. } => hasher.hash_bytes(text),
            HashStrategy::AminoAcid { .. } => pack_valid_residues(text),
        }
    }

    /// Validate and encode a user-supplied pattern (case-insensitive)
    ///
    /// # Errors
    /// Returns an error if the length differs from `k` or a symbol lies
    /// outside the strategy alphabet.
    pub fn try_encode(&self, text: &[u8]) -> Result<u64> {
        if text.len() != self.k() {
            return Err(DecoderError::LengthMismatch {
                expected: self.k(),
                actual: text.len(),
            });
        }
        if let Some(position) = text.iter().position(|&s| !self.accepts(s)) {
            return Err(DecoderError::InvalidSymbol {
                symbol: text[position] as char,
                position,
            });
        }
        Ok(self.encode(&text.to_ascii_uppercase()))
    }

    /// Decode a code back to its pattern
    ///
    /// Under canonical mode this is the canonical strand representative.
    ///
    /// # Errors
    /// Returns [`DecoderError::UnsupportedOperation`] for irreversible
    /// strategies and [`DecoderError::InvalidCode`] for codes no pattern
    /// of length `k` encodes to.
    pub fn decode(&self, code: u64) -> Result<String> {
        match self {
            HashStrategy::Murmur { .. } | HashStrategy::BigKmer { .. } => {
                Err(DecoderError::UnsupportedOperation {
                    mode: self.mode().name(),
                    operation: "decoding",
                })
            }
            HashStrategy::Integer { k, mix, .. } => {
                if code & !mix.mask() != 0 {
                    return Err(DecoderError::InvalidCode(code));
                }
                Ok(unpack_bases(mix.unhash(code), *k))
            }
            HashStrategy::TwoBits { k, .. } => {
                if code & !kmer_mask(*k) != 0 {
                    return Err(DecoderError::InvalidCode(code));
                }
                Ok(unpack_bases(code, *k))
            }
            HashStrategy::AminoAcid { k } => {
                if code & !low_bits_mask(k * BITS_PER_RESIDUE) != 0 {
                    return Err(DecoderError::InvalidCode(code));
                }
                unpack_residues(code, *k).ok_or(DecoderError::InvalidCode(code))
            }
        }
    }
}
