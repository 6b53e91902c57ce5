//! Error type shared by extractors, strategies and decoders

use thiserror::Error;

/// Errors raised while configuring or running a k-mer decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// Skip-mer shape violates `0 < m <= n`, `m <= k`, `k % m == 0`
    #[error("invalid skip-mer shape m={m}, n={n}, k={k}: conditions are 0 < m <= n, m <= k and k a multiple of m")]
    InvalidSkipmerShape {
        /// Retained bases per cycle
        m: usize,
        /// Cycle length
        n: usize,
        /// Retained bases per skip-mer
        k: usize,
    },

    /// Reading frame outside 1..=3
    #[error("invalid reading frame {0}: expected 1, 2 or 3 (0 selects all frames)")]
    InvalidReadingFrame(u8),

    /// Pattern length not supported by the selected encoding
    #[error("k={k} is not supported here: expected 1 <= k <= {max}")]
    InvalidKmerSize {
        /// Requested pattern length
        k: usize,
        /// Largest supported pattern length
        max: usize,
    },

    /// Pattern length of zero
    #[error("pattern length must be at least 1")]
    EmptyPattern,

    /// Amino-acid pattern length beyond what 5-bit packing can hold
    #[error("amino-acid k-mers are limited to k <= 11, got k={0}")]
    AminoAcidKmerTooLong(usize),

    /// Minimizer window of zero k-mers
    #[error("minimizer window must span at least one k-mer, got w={0}")]
    InvalidWindow(usize),

    /// Chunks must hold at least one record
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    /// Unrecognized hashing-mode selector
    #[error("hashing mode {0} is not supported (0: Murmur, 1: Integer, 2: TwoBits, 3: BigKmer)")]
    UnsupportedHashMode(i32),

    /// Hashing strategy that cannot encode the alphabet of the slicer
    #[error("{mode} hashing cannot be used with {slicing} slicing")]
    IncompatibleHashMode {
        /// Strategy name
        mode: &'static str,
        /// Slicing mode name
        slicing: &'static str,
    },

    /// Operation the strategy does not provide (e.g. inverting a one-way hash)
    #[error("{mode} hashing does not support {operation}")]
    UnsupportedOperation {
        /// Strategy name
        mode: &'static str,
        /// Rejected operation
        operation: &'static str,
    },

    /// Input length differs from the pattern length
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected pattern length
        expected: usize,
        /// Actual input length
        actual: usize,
    },

    /// Symbol outside the alphabet of the strategy
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol {
        /// Offending symbol
        symbol: char,
        /// Position in the input
        position: usize,
    },

    /// Code that does not decode to a valid pattern
    #[error("code {0:#x} does not decode to a valid pattern")]
    InvalidCode(u64),

    /// Sequence file could not be opened
    #[error("failed to open sequence file {path}: {message}")]
    Open {
        /// File path
        path: String,
        /// Underlying reader message
        message: String,
    },

    /// Sequence stream could not be read or parsed
    #[error("failed to read sequence stream {path}: {message}")]
    Stream {
        /// File path (or source description)
        path: String,
        /// Underlying reader message
        message: String,
    },

    /// The decoder hit a stream error earlier and can no longer be used
    #[error("decoder is unusable after an earlier stream error")]
    Failed,
}

/// Result alias for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;
