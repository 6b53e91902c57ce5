//! Minimizer extraction
//!
//! For every window of `w` consecutive k-mers (`w + k - 1` bases), the
//! lexicographically smallest k-mer is the window's minimizer; ties go to
//! the leftmost k-mer. Adjacent windows usually share their minimizer, so
//! only minimizers that differ from the previously emitted one are kept.
//!
//! The window minimum is maintained incrementally with a monotone deque of
//! candidate k-mer starts, so each k-mer is pushed and popped at most once.
//! K-mers containing ambiguous bases are never candidates.

use super::{normalize, InvalidPrefix, Substring};
use crate::encoding::is_valid_base;
use crate::error::{DecoderError, Result};
use crate::hashing::HashStrategy;
use std::collections::VecDeque;

/// A selected minimizer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MinimizerInfo {
    /// Start of the minimizer in the sequence
    pub position: usize,
    /// Minimizer length (always k)
    pub length: usize,
    /// Minimizer bases (uppercase)
    pub seq: String,
}

impl MinimizerInfo {
    /// Create a new minimizer info
    pub fn new(position: usize, length: usize, seq: String) -> Self {
        Self {
            position,
            length,
            seq,
        }
    }
}

/// Extracts the minimizer stream of a sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimizerSlicer {
    k: usize,
    w: usize,
}

impl MinimizerSlicer {
    /// Create a minimizer slicer
    ///
    /// # Arguments
    /// * `k` - minimizer length
    /// * `w` - number of consecutive k-mers per window
    pub fn new(k: usize, w: usize) -> Result<Self> {
        if k == 0 {
            return Err(DecoderError::EmptyPattern);
        }
        if w == 0 {
            return Err(DecoderError::InvalidWindow(w));
        }
        Ok(Self { k, w })
    }

    /// Minimizer length
    pub fn k(&self) -> usize {
        self.k
    }

    /// K-mers per window
    pub fn w(&self) -> usize {
        self.w
    }

    /// Bases covered by one window
    pub fn window_span(&self) -> usize {
        self.w + self.k - 1
    }

    /// Minimizer stream of `seq`, without consecutive repeats
    pub fn minimizers(&self, seq: &[u8]) -> Vec<MinimizerInfo> {
        let seq = normalize(seq);
        let k = self.k;
        let mut out = Vec::new();
        if seq.len() < self.window_span() {
            return out;
        }

        let num_kmers = seq.len() - k + 1;
        let invalid = InvalidPrefix::new(&seq, is_valid_base);
        let kmer = |i: usize| &seq[i..i + k];

        let mut candidates: VecDeque<usize> = VecDeque::with_capacity(self.w);
        let mut last_emitted: Option<usize> = None;

        for j in 0..num_kmers {
            if invalid.is_clean(j, k) {
                // Equal k-mers stay queued, so the leftmost one wins ties
                while candidates.back().is_some_and(|&b| kmer(b) > kmer(j)) {
                    candidates.pop_back();
                }
                candidates.push_back(j);
            }

            if j + 1 < self.w {
                continue;
            }
            let window_start = j + 1 - self.w;
            while candidates.front().is_some_and(|&f| f < window_start) {
                candidates.pop_front();
            }

            if let Some(&best) = candidates.front() {
                if last_emitted != Some(best) {
                    out.push(MinimizerInfo::new(
                        best,
                        k,
                        String::from_utf8_lossy(kmer(best)).into_owned(),
                    ));
                    last_emitted = Some(best);
                }
            }
        }
        out
    }

    /// Minimizers encoded with `hasher`
    pub fn extract(&self, seq: &[u8], hasher: &HashStrategy) -> Vec<Substring> {
        self.minimizers(seq)
            .into_iter()
            .map(|m| {
                let code = hasher.encode(m.seq.as_bytes());
                Substring::new(m.seq, code, m.position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute force: minimum of every window, leftmost on ties, then dedup
    fn naive(seq: &[u8], k: usize, w: usize) -> Vec<(usize, String)> {
        let mut out: Vec<(usize, String)> = Vec::new();
        if seq.len() < w + k - 1 {
            return out;
        }
        for start in 0..=(seq.len() - (w + k - 1)) {
            let mut best = start;
            for i in start..start + w {
                if seq[i..i + k] < seq[best..best + k] {
                    best = i;
                }
            }
            if out.last().map(|(p, _)| *p) != Some(best) {
                out.push((best, String::from_utf8_lossy(&seq[best..best + k]).into_owned()));
            }
        }
        out
    }

    #[test]
    fn test_window_validation() {
        assert_eq!(MinimizerSlicer::new(5, 0), Err(DecoderError::InvalidWindow(0)));
        assert_eq!(MinimizerSlicer::new(0, 5), Err(DecoderError::EmptyPattern));
        assert_eq!(MinimizerSlicer::new(5, 4).unwrap().window_span(), 8);
    }

    #[test]
    fn test_matches_brute_force() {
        let seq = b"ATTTTCAGGATGTTTTCAGGTTCATCATCTCCCTTCTTTGCAGGATAGTAGATAAGATCGCTCATCAACGGATGTTGTGT";
        for (k, w) in [(3, 1), (5, 4), (7, 10), (11, 3)] {
            let slicer = MinimizerSlicer::new(k, w).unwrap();
            let got: Vec<(usize, String)> = slicer
                .minimizers(seq)
                .into_iter()
                .map(|m| (m.position, m.seq))
                .collect();
            assert_eq!(got, naive(seq, k, w), "k={} w={}", k, w);
        }
    }

    #[test]
    fn test_shared_minimizer_emitted_once() {
        // Windows 0 and 1 share CGT, windows 2 and 3 share AAC
        let slicer = MinimizerSlicer::new(3, 3).unwrap();
        let minis = slicer.minimizers(b"TCGTAACG");
        let positions: Vec<usize> = minis.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 4]);
        assert_eq!(minis[1].seq, "AAC");
        assert_eq!(minis[1].length, 3);
    }

    #[test]
    fn test_ties_take_leftmost() {
        let slicer = MinimizerSlicer::new(2, 4).unwrap();
        let minis = slicer.minimizers(b"CACACA");
        // Windows: CA AC CA AC / AC CA AC CA: AC at position 1 is leftmost in both
        assert_eq!(minis, vec![MinimizerInfo::new(1, 2, "AC".to_string())]);
    }

    #[test]
    fn test_ambiguous_kmers_are_not_candidates() {
        let slicer = MinimizerSlicer::new(3, 2).unwrap();
        let minis = slicer.minimizers(b"GGNAAGG");
        assert!(minis.iter().all(|m| !m.seq.contains('N')));
        // Windows starting at 0 and 1 contain no clean k-mer; AAG then wins twice
        let positions: Vec<usize> = minis.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![3]);
    }

    #[test]
    fn test_sequence_shorter_than_window() {
        let slicer = MinimizerSlicer::new(4, 5).unwrap();
        assert!(slicer.minimizers(b"ACGTACG").is_empty());
    }

    #[test]
    fn test_extract_encodes_minimizers() {
        let slicer = MinimizerSlicer::new(4, 3).unwrap();
        let hasher = HashStrategy::two_bits(4, false).unwrap();
        let seq = b"TTGACCATGGATTC";
        let minis = slicer.minimizers(seq);
        let substrings = slicer.extract(seq, &hasher);
        assert_eq!(minis.len(), substrings.len());
        for (m, s) in minis.iter().zip(&substrings) {
            assert_eq!(m.seq, s.text);
            assert_eq!(m.position, s.position);
            assert_eq!(hasher.decode(s.code).unwrap(), s.text);
        }
    }
}
