// kmerdecoder: streaming k-mer, skip-mer and minimizer extraction
//
// Turns nucleotide and protein sequence files into chunks of encoded
// fixed-length patterns, with reversible and one-way encodings.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod hasher;
pub mod hashing;
pub mod reader;
pub mod slicing;

// Re-export common types at crate root
pub use config::{DecoderConfiguration, SlicingMode};
pub use decoder::{Chunk, Decoder, StreamState};
pub use error::{DecoderError, Result};
pub use extractor::KmerExtractor;
pub use hashing::{HashMode, HashStrategy};
pub use reader::{FastxSource, MemorySource, SequenceRecord, SequenceSource};
pub use slicing::{MinimizerInfo, Slicer, Substring};

/// Version information
pub fn version() -> (u8, u8, u8) {
    constants::VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let (major, minor, patch) = version();
        assert_eq!(major, 0);
        assert_eq!(minor, 1);
        assert_eq!(patch, 0);
    }
}
