//! A slicer bound to the hashing strategy it encodes with
//!
//! [`KmerExtractor`] is the file-independent half of a decoder: it turns a
//! single sequence into substrings and exposes the single-value
//! operations (`hash_kmer`, `ihash_kmer`, `k`). The strategy is owned
//! exclusively and is replaced wholesale by [`KmerExtractor::set_hashing_mode`].

use crate::error::{DecoderError, Result};
use crate::hashing::{HashMode, HashStrategy};
use crate::slicing::{
    AminoAcidSlicer, KmerSlicer, MinimizerSlicer, SkipmerSlicer, Slicer, Substring,
};

/// Extraction algorithm plus its hashing strategy
#[derive(Clone, Debug)]
pub struct KmerExtractor {
    slicer: Slicer,
    hasher: HashStrategy,
}

impl KmerExtractor {
    /// Pair a slicer with the strategy selected by `mode`
    ///
    /// # Errors
    /// Returns an error if the strategy cannot encode the slicer's alphabet
    /// or pattern length.
    pub fn new(slicer: Slicer, mode: HashMode, canonical: bool) -> Result<Self> {
        let hasher = Self::build_hasher(&slicer, mode, canonical)?;
        Ok(Self { slicer, hasher })
    }

    /// Plain k-mers with canonical Integer hashing
    pub fn kmers(k: usize) -> Result<Self> {
        Self::new(Slicer::Kmers(KmerSlicer::new(k)?), HashMode::Integer, true)
    }

    /// Skip-mers with canonical Integer hashing; `orf == 0` scans all frames
    pub fn skipmers(m: usize, n: usize, k: usize, orf: u8) -> Result<Self> {
        Self::new(
            Slicer::Skipmers(SkipmerSlicer::new(m, n, k, orf)?),
            HashMode::Integer,
            true,
        )
    }

    /// Minimizers with canonical Integer hashing
    pub fn minimizers(k: usize, w: usize) -> Result<Self> {
        Self::new(
            Slicer::Minimizers(MinimizerSlicer::new(k, w)?),
            HashMode::Integer,
            true,
        )
    }

    /// Amino-acid k-mers (always amino-acid hashing)
    pub fn amino_acid_kmers(k: usize) -> Result<Self> {
        Self::new(
            Slicer::AminoAcidKmers(AminoAcidSlicer::new(k)?),
            HashMode::AminoAcid,
            false,
        )
    }

    fn build_hasher(slicer: &Slicer, mode: HashMode, canonical: bool) -> Result<HashStrategy> {
        if slicer.is_protein() != mode.is_protein() {
            return Err(DecoderError::IncompatibleHashMode {
                mode: mode.name(),
                slicing: slicer.name(),
            });
        }
        HashStrategy::new(mode, slicer.k(), canonical)
    }

    /// Replace the hashing strategy
    ///
    /// On error the current strategy is kept.
    pub fn set_hashing_mode(&mut self, mode: HashMode, canonical: bool) -> Result<()> {
        self.hasher = Self::build_hasher(&self.slicer, mode, canonical)?;
        Ok(())
    }

    /// Extract and encode the substrings of one sequence
    pub fn seq_to_kmers(&self, seq: &[u8]) -> Vec<Substring> {
        self.slicer.extract(seq, &self.hasher)
    }

    /// Encode a single pattern of length `k`
    pub fn hash_kmer(&self, kmer: &str) -> Result<u64> {
        self.hasher.try_encode(kmer.as_bytes())
    }

    /// Decode a single code (reversible strategies only)
    pub fn ihash_kmer(&self, code: u64) -> Result<String> {
        self.hasher.decode(code)
    }

    /// Pattern length
    pub fn k(&self) -> usize {
        self.slicer.k()
    }

    /// Active hashing mode
    pub fn hash_mode(&self) -> HashMode {
        self.hasher.mode()
    }

    /// Whether codes are strand-independent
    pub fn canonical(&self) -> bool {
        self.hasher.canonical()
    }

    /// Slicing mode name
    pub fn slicing_mode(&self) -> &'static str {
        self.slicer.name()
    }

    /// The extraction algorithm
    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    /// The hashing strategy
    pub fn hasher(&self) -> &HashStrategy {
        &self.hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::reverse_complement;

    #[test]
    fn test_defaults() {
        let extractor = KmerExtractor::kmers(21).unwrap();
        assert_eq!(extractor.k(), 21);
        assert_eq!(extractor.hash_mode(), HashMode::Integer);
        assert!(extractor.canonical());
        assert_eq!(extractor.slicing_mode(), "kmers");
    }

    #[test]
    fn test_single_value_roundtrip() {
        let mut extractor = KmerExtractor::kmers(7).unwrap();
        extractor.set_hashing_mode(HashMode::Integer, false).unwrap();
        let code = extractor.hash_kmer("GATTACA").unwrap();
        assert_eq!(extractor.ihash_kmer(code).unwrap(), "GATTACA");
    }

    #[test]
    fn test_canonical_single_values() {
        let extractor = KmerExtractor::kmers(7).unwrap();
        let rc = String::from_utf8(reverse_complement(b"GATTACA")).unwrap();
        assert_eq!(
            extractor.hash_kmer("GATTACA").unwrap(),
            extractor.hash_kmer(&rc).unwrap()
        );
    }

    #[test]
    fn test_set_hashing_mode_replaces_strategy() {
        let mut extractor = KmerExtractor::minimizers(5, 4).unwrap();
        extractor.set_hashing_mode(HashMode::Murmur, true).unwrap();
        assert_eq!(extractor.hash_mode(), HashMode::Murmur);
        assert!(!extractor.canonical());
        assert!(matches!(
            extractor.ihash_kmer(42),
            Err(DecoderError::UnsupportedOperation { .. })
        ));

        extractor.set_hashing_mode(HashMode::TwoBits, false).unwrap();
        let code = extractor.hash_kmer("ACGTT").unwrap();
        assert_eq!(extractor.ihash_kmer(code).unwrap(), "ACGTT");
    }

    #[test]
    fn test_failed_mode_change_keeps_strategy() {
        // Integer cannot pack 40 bases
        assert_eq!(
            KmerExtractor::kmers(40).unwrap_err(),
            DecoderError::InvalidKmerSize { k: 40, max: 32 }
        );
        let mut extractor = KmerExtractor::new(
            Slicer::Kmers(KmerSlicer::new(40).unwrap()),
            HashMode::BigKmer,
            false,
        )
        .unwrap();
        assert_eq!(extractor.hash_mode(), HashMode::BigKmer);
        assert!(extractor.set_hashing_mode(HashMode::Integer, true).is_err());
        assert_eq!(extractor.hash_mode(), HashMode::BigKmer);
    }

    #[test]
    fn test_protein_and_nucleotide_modes_do_not_mix() {
        let mut aa = KmerExtractor::amino_acid_kmers(5).unwrap();
        assert_eq!(aa.slicing_mode(), "aa_kmers");
        assert_eq!(
            aa.set_hashing_mode(HashMode::Integer, true).unwrap_err(),
            DecoderError::IncompatibleHashMode { mode: "Integer", slicing: "aa_kmers" }
        );

        let err = KmerExtractor::new(
            Slicer::Kmers(KmerSlicer::new(5).unwrap()),
            HashMode::AminoAcid,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, DecoderError::IncompatibleHashMode { .. }));
    }

    #[test]
    fn test_construction_errors() {
        assert!(KmerExtractor::skipmers(3, 2, 6, 0).is_err());
        assert!(KmerExtractor::skipmers(2, 3, 6, 0).is_ok());
        assert!(KmerExtractor::skipmers(2, 3, 5, 0).is_err());
        assert!(KmerExtractor::amino_acid_kmers(12).is_err());
        assert!(KmerExtractor::amino_acid_kmers(11).is_ok());
        assert!(KmerExtractor::minimizers(5, 0).is_err());
    }

    #[test]
    fn test_seq_to_kmers() {
        let extractor = KmerExtractor::kmers(3).unwrap();
        let kmers = extractor.seq_to_kmers(b"ACGTA");
        assert_eq!(kmers.len(), 3);
        assert_eq!(kmers[2].code, extractor.hash_kmer("GTA").unwrap());
    }
}
