//! Skip-mer extraction
//!
//! A skip-mer with shape `(m, n, k)` keeps `m` consecutive bases out of
//! every cycle of `n`, until `k` bases have been kept. The source window
//! this touches has length
//!
//! ```text
//! span = k + ((k - 1) / m) * (n - m)
//! ```
//!
//! Windows start at the reading-frame offset and advance one cycle (`n`
//! bases) at a time, so each frame yields a disjoint set of skip-mers.

use super::{normalize, InvalidPrefix, Substring};
use crate::constants::ALL_READING_FRAMES;
use crate::error::{DecoderError, Result};
use crate::hashing::HashStrategy;

/// Validated skip-mer geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkipmerShape {
    m: usize,
    n: usize,
    k: usize,
    span: usize,
}

impl SkipmerShape {
    /// Validate a shape
    ///
    /// # Errors
    /// Returns [`DecoderError::InvalidSkipmerShape`] unless `0 < m`,
    /// `m <= n`, `m <= k` and `k % m == 0`.
    pub fn new(m: usize, n: usize, k: usize) -> Result<Self> {
        if m == 0 || n < m || k < m || k % m != 0 {
            return Err(DecoderError::InvalidSkipmerShape { m, n, k });
        }
        let span = k + ((k - 1) / m) * (n - m);
        Ok(Self { m, n, k, span })
    }

    /// Bases kept per cycle
    pub fn m(&self) -> usize {
        self.m
    }

    /// Cycle length
    pub fn n(&self) -> usize {
        self.n
    }

    /// Bases kept per skip-mer
    pub fn k(&self) -> usize {
        self.k
    }

    /// Source bases touched by one skip-mer
    pub fn span(&self) -> usize {
        self.span
    }

    /// Whether offset `j` of a window is kept
    #[inline]
    fn keeps(&self, j: usize) -> bool {
        j % self.n < self.m
    }

    /// Gather the kept bases of the window starting at `start`
    fn gather(&self, seq: &[u8], start: usize) -> Vec<u8> {
        (0..self.span)
            .filter(|&j| self.keeps(j))
            .take(self.k)
            .map(|j| seq[start + j])
            .collect()
    }
}

/// Extracts skip-mers from one or all reading frames
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkipmerSlicer {
    shape: SkipmerShape,
    frames: Vec<usize>,
}

impl SkipmerSlicer {
    /// Create a skip-mer slicer
    ///
    /// `orf` is the 1-based reading frame to scan; `0` scans frames 0, 1 and 2.
    pub fn new(m: usize, n: usize, k: usize, orf: u8) -> Result<Self> {
        let shape = SkipmerShape::new(m, n, k)?;
        let frames = match orf {
            0 => ALL_READING_FRAMES.to_vec(),
            1..=3 => vec![orf as usize - 1],
            other => return Err(DecoderError::InvalidReadingFrame(other)),
        };
        Ok(Self { shape, frames })
    }

    /// Shape of the skip-mers
    pub fn shape(&self) -> SkipmerShape {
        self.shape
    }

    /// 0-based frames scanned, in extraction order
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    /// Skip-mer length
    pub fn k(&self) -> usize {
        self.shape.k
    }

    /// Skip-mers of every frame, frame by frame
    pub fn extract(&self, seq: &[u8], hasher: &HashStrategy) -> Vec<Substring> {
        let seq = normalize(seq);
        let span = self.shape.span;
        let mut out = Vec::new();
        if seq.len() < span {
            return out;
        }
        let invalid = InvalidPrefix::new(&seq, |s| hasher.accepts(s));

        for &frame in &self.frames {
            let mut start = frame;
            while start + span <= seq.len() {
                if invalid.is_clean(start, span) {
                    let kept = self.shape.gather(&seq, start);
                    let code = hasher.encode(&kept);
                    out.push(Substring::new(
                        String::from_utf8_lossy(&kept).into_owned(),
                        code,
                        start,
                    ));
                }
                start += self.shape.n;
            }
        }
        out
    }
}
