//! Amino-acid k-mers over protein sequences

use super::{slide_windows, Substring};
use crate::constants::MAX_AMINO_ACID_K;
use crate::error::{DecoderError, Result};
use crate::hashing::HashStrategy;

/// Slides a k-window over a protein sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AminoAcidSlicer {
    k: usize,
}

impl AminoAcidSlicer {
    /// Create a slicer for amino-acid k-mers; `k` must not exceed 11
    pub fn new(k: usize) -> Result<Self> {
        if k > MAX_AMINO_ACID_K {
            return Err(DecoderError::AminoAcidKmerTooLong(k));
        }
        if k == 0 {
            return Err(DecoderError::EmptyPattern);
        }
        Ok(Self { k })
    }

    /// K-mer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// All k-mers made of standard residues
    pub fn extract(&self, seq: &[u8], hasher: &HashStrategy) -> Vec<Substring> {
        debug_assert!(hasher.mode().is_protein());
        slide_windows(seq, self.k, hasher)
    }
}
