//! Plain k-mer extraction over nucleotide sequences

use super::{slide_windows, Substring};
use crate::error::{DecoderError, Result};
use crate::hashing::HashStrategy;

/// Slides a k-window one base at a time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KmerSlicer {
    k: usize,
}

impl KmerSlicer {
    /// Create a slicer for k-mers of length `k`
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(DecoderError::EmptyPattern);
        }
        Ok(Self { k })
    }

    /// K-mer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// All ACGT-only k-mers of `seq` at positions `0..=len-k`
    pub fn extract(&self, seq: &[u8], hasher: &HashStrategy) -> Vec<Substring> {
        slide_windows(seq, self.k, hasher)
    }
}
