//! Substring extraction algorithms
//!
//! Each slicer turns one sequence into an ordered list of [`Substring`]s,
//! encoding every extracted pattern with the [`HashStrategy`] it is given:
//! - [`KmerSlicer`]: every k-length window
//! - [`SkipmerSlicer`]: cyclic keep-m/skip-(n-m) patterns per reading frame
//! - [`MinimizerSlicer`]: smallest k-mer of each window of w k-mers
//! - [`AminoAcidSlicer`]: k-length windows over protein sequences
//!
//! Windows touching a symbol outside the alphabet are skipped without
//! shifting the positions of the windows that follow.

pub mod kmers;
pub mod minimizers;
pub mod protein;
pub mod skipmers;

pub use kmers::KmerSlicer;
pub use minimizers::{MinimizerInfo, MinimizerSlicer};
pub use protein::AminoAcidSlicer;
pub use skipmers::{SkipmerShape, SkipmerSlicer};

use crate::hashing::HashStrategy;
use std::borrow::Cow;

/// One extracted pattern and its code
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Substring {
    /// Extracted symbols (uppercase)
    pub text: String,
    /// Code assigned by the hashing strategy
    pub code: u64,
    /// Start of the source window in the sequence
    pub position: usize,
}

impl Substring {
    /// Create a new substring record
    pub fn new(text: String, code: u64, position: usize) -> Self {
        Self { text, code, position }
    }

    /// Number of symbols in the pattern
    pub fn length(&self) -> usize {
        self.text.len()
    }
}

/// The closed set of extraction algorithms
#[derive(Clone, Debug)]
pub enum Slicer {
    /// Plain k-mers
    Kmers(KmerSlicer),
    /// Skip-mers
    Skipmers(SkipmerSlicer),
    /// Minimizers
    Minimizers(MinimizerSlicer),
    /// Amino-acid k-mers
    AminoAcidKmers(AminoAcidSlicer),
}

impl Slicer {
    /// Length of the patterns this slicer emits
    pub fn k(&self) -> usize {
        match self {
            Slicer::Kmers(s) => s.k(),
            Slicer::Skipmers(s) => s.k(),
            Slicer::Minimizers(s) => s.k(),
            Slicer::AminoAcidKmers(s) => s.k(),
        }
    }

    /// Slicing mode name
    pub fn name(&self) -> &'static str {
        match self {
            Slicer::Kmers(_) => "kmers",
            Slicer::Skipmers(_) => "skipmers",
            Slicer::Minimizers(_) => "minimizers",
            Slicer::AminoAcidKmers(_) => "aa_kmers",
        }
    }

    /// Whether the slicer reads protein rather than nucleotide sequences
    pub fn is_protein(&self) -> bool {
        matches!(self, Slicer::AminoAcidKmers(_))
    }

    /// Extract and encode all patterns of `seq`, in extraction order
    pub fn extract(&self, seq: &[u8], hasher: &HashStrategy) -> Vec<Substring> {
        match self {
            Slicer::Kmers(s) => s.extract(seq, hasher),
            Slicer::Skipmers(s) => s.extract(seq, hasher),
            Slicer::Minimizers(s) => s.extract(seq, hasher),
            Slicer::AminoAcidKmers(s) => s.extract(seq, hasher),
        }
    }
}

/// Uppercase a sequence, borrowing when it already is
pub(crate) fn normalize(seq: &[u8]) -> Cow<'_, [u8]> {
    if seq.iter().any(u8::is_ascii_lowercase) {
        Cow::Owned(seq.to_ascii_uppercase())
    } else {
        Cow::Borrowed(seq)
    }
}

/// Prefix counts of invalid symbols, for O(1) window checks
pub(crate) struct InvalidPrefix {
    counts: Vec<usize>,
}

impl InvalidPrefix {
    pub(crate) fn new(seq: &[u8], valid: impl Fn(u8) -> bool) -> Self {
        let mut counts = Vec::with_capacity(seq.len() + 1);
        let mut running = 0usize;
        counts.push(running);
        for &s in seq {
            if !valid(s) {
                running += 1;
            }
            counts.push(running);
        }
        Self { counts }
    }

    /// Whether `seq[start..start + len]` holds only valid symbols
    #[inline]
    pub(crate) fn is_clean(&self, start: usize, len: usize) -> bool {
        self.counts[start + len] == self.counts[start]
    }
}

/// Slide a `k`-window over `seq`, encoding every window whose symbols are
/// all accepted by `hasher`.
pub(crate) fn slide_windows(seq: &[u8], k: usize, hasher: &HashStrategy) -> Vec<Substring> {
    let seq = normalize(seq);
    if k == 0 || seq.len() < k {
        return Vec::new();
    }
    let invalid = InvalidPrefix::new(&seq, |s| hasher.accepts(s));
    let mut out = Vec::with_capacity(seq.len() - k + 1);
    for start in 0..=(seq.len() - k) {
        if !invalid.is_clean(start, k) {
            continue;
        }
        let window = &seq[start..start + k];
        out.push(Substring::new(
            String::from_utf8_lossy(window).into_owned(),
            hasher.encode(window),
            start,
        ));
    }
    out
}
