//! Decoder configuration
//!
//! Gathers the slicing parameters, hashing mode and chunk size of a
//! decoder in one validated value.

use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::{DecoderError, Result};
use crate::extractor::KmerExtractor;
use crate::hashing::HashMode;
use crate::slicing::{AminoAcidSlicer, KmerSlicer, MinimizerSlicer, SkipmerSlicer, Slicer};

/// Extraction algorithm and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicingMode {
    /// Every k-length window
    Kmers {
        /// K-mer length
        k: usize,
    },
    /// Keep `m` bases out of every `n` until `k` are kept
    Skipmers {
        /// Bases kept per cycle
        m: usize,
        /// Cycle length
        n: usize,
        /// Bases kept per skip-mer
        k: usize,
        /// 1-based reading frame, 0 for all three
        orf: u8,
    },
    /// Smallest k-mer of each window of `w` k-mers
    Minimizers {
        /// Minimizer length
        k: usize,
        /// K-mers per window
        w: usize,
    },
    /// Every k-length window of a protein sequence
    AminoAcidKmers {
        /// K-mer length
        k: usize,
    },
}

impl SlicingMode {
    /// Pattern length
    pub fn k(&self) -> usize {
        match *self {
            SlicingMode::Kmers { k }
            | SlicingMode::Skipmers { k, .. }
            | SlicingMode::Minimizers { k, .. }
            | SlicingMode::AminoAcidKmers { k } => k,
        }
    }

    /// Build the slicer these parameters describe
    pub fn build_slicer(&self) -> Result<Slicer> {
        Ok(match *self {
            SlicingMode::Kmers { k } => Slicer::Kmers(KmerSlicer::new(k)?),
            SlicingMode::Skipmers { m, n, k, orf } => {
                Slicer::Skipmers(SkipmerSlicer::new(m, n, k, orf)?)
            }
            SlicingMode::Minimizers { k, w } => Slicer::Minimizers(MinimizerSlicer::new(k, w)?),
            SlicingMode::AminoAcidKmers { k } => {
                Slicer::AminoAcidKmers(AminoAcidSlicer::new(k)?)
            }
        })
    }
}

/// Configuration of a streaming decoder
#[derive(Debug, Clone)]
pub struct DecoderConfiguration {
    /// Extraction algorithm
    pub slicing: SlicingMode,

    /// Hashing strategy
    pub hash_mode: HashMode,

    /// Map a k-mer and its reverse complement to the same code
    /// (Integer and TwoBits only)
    pub canonical: bool,

    /// Records per chunk
    pub chunk_size: usize,
}

impl Default for DecoderConfiguration {
    fn default() -> Self {
        Self {
            slicing: SlicingMode::Kmers { k: 21 },
            hash_mode: HashMode::Integer,
            canonical: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DecoderConfiguration {
    /// Configuration for the given slicing mode with its natural hashing
    /// (canonical Integer for nucleotides, AminoAcid for proteins)
    pub fn new(slicing: SlicingMode) -> Result<Self> {
        let hash_mode = match slicing {
            SlicingMode::AminoAcidKmers { .. } => HashMode::AminoAcid,
            _ => HashMode::Integer,
        };
        let config = Self {
            slicing,
            hash_mode,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the hashing mode
    pub fn with_hash_mode(mut self, hash_mode: HashMode, canonical: bool) -> Self {
        self.hash_mode = hash_mode;
        self.canonical = canonical;
        self
    }

    /// Set the number of records per chunk
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DecoderError::InvalidChunkSize);
        }
        self.build_extractor().map(|_| ())
    }

    /// Build the extractor for this configuration
    pub fn build_extractor(&self) -> Result<KmerExtractor> {
        KmerExtractor::new(self.slicing.build_slicer()?, self.hash_mode, self.canonical)
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Decoder Configuration:");
        match self.slicing {
            SlicingMode::Kmers { k } => tracing::info!("  slicing = kmers (k = {})", k),
            SlicingMode::Skipmers { m, n, k, orf } => {
                tracing::info!("  slicing = skipmers (m = {}, n = {}, k = {})", m, n, k);
                if orf == 0 {
                    tracing::info!("  reading frames = all");
                } else {
                    tracing::info!("  reading frame = {}", orf);
                }
            }
            SlicingMode::Minimizers { k, w } => {
                tracing::info!("  slicing = minimizers (k = {}, w = {})", k, w)
            }
            SlicingMode::AminoAcidKmers { k } => tracing::info!("  slicing = aa_kmers (k = {})", k),
        }
        tracing::info!("  hash_mode = {}", self.hash_mode);
        tracing::info!("  canonical = {}", self.canonical);
        tracing::debug!("  chunk_size = {}", self.chunk_size);
    }
}
