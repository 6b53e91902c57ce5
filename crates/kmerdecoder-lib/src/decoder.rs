//! Chunked streaming decoder
//!
//! A [`Decoder`] pulls records from a [`SequenceSource`], runs each
//! sequence through its [`KmerExtractor`] and groups the results by record
//! name. Records are consumed in chunks of at most `chunk_size` distinct
//! names, so memory stays bounded however large the input is.
//!
//! ```text
//!            next_chunk()            short chunk
//!   Open ──────────────► Draining ─────────────► Exhausted
//!                          │   ▲
//!                          └───┘ full chunk
//!
//!   Open | Draining ── stream error ──► Failed
//! ```
//!
//! The source is dropped as soon as the decoder reaches `Exhausted` or
//! `Failed`, and otherwise when the decoder itself is dropped.

use crate::config::DecoderConfiguration;
use crate::error::{DecoderError, Result};
use crate::extractor::KmerExtractor;
use crate::hashing::HashMode;
use crate::reader::{FastxSource, SequenceSource};
use crate::slicing::Substring;
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extraction results of one chunk, keyed by record name
pub type Chunk = AHashMap<String, Vec<Substring>>;

/// Stream position of a decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    /// Constructed, no chunk requested yet
    Open,
    /// Full chunks have been produced; more input may follow
    Draining,
    /// Input ended; further chunks are empty
    Exhausted,
    /// A stream error occurred; the decoder is unusable
    Failed,
}

/// Streaming k-mer decoder over one input
pub struct Decoder<S: SequenceSource = FastxSource> {
    source: Option<S>,
    source_name: String,
    file_name: Option<PathBuf>,
    extractor: KmerExtractor,
    chunk_size: usize,
    chunk: Chunk,
    state: StreamState,
    chunks_served: u64,
}

impl Decoder<FastxSource> {
    /// Open a sequence file with the given configuration
    ///
    /// The configuration is validated before the file is opened.
    pub fn open<P: AsRef<Path>>(path: P, config: &DecoderConfiguration) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(DecoderError::InvalidChunkSize);
        }
        let extractor = config.build_extractor()?;
        let source = FastxSource::open(path.as_ref())?;
        let mut decoder = Self::from_source(source, extractor, config.chunk_size)?;
        decoder.file_name = Some(path.as_ref().to_path_buf());
        Ok(decoder)
    }
}

impl<S: SequenceSource> Decoder<S> {
    /// Wrap an already-open source
    pub fn from_source(source: S, extractor: KmerExtractor, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DecoderError::InvalidChunkSize);
        }
        let source_name = source.describe();
        info!(
            "Opened {} ({} k={}, {} hashing)",
            source_name,
            extractor.slicing_mode(),
            extractor.k(),
            extractor.hash_mode()
        );
        Ok(Self {
            source: Some(source),
            source_name,
            file_name: None,
            extractor,
            chunk_size,
            chunk: Chunk::default(),
            state: StreamState::Open,
            chunks_served: 0,
        })
    }

    /// Read the next chunk of records
    ///
    /// Once the input has ended this returns an empty chunk. On a stream
    /// error the previous chunk is left untouched, the source is released
    /// and every later call fails with [`DecoderError::Failed`].
    pub fn next_chunk(&mut self) -> Result<&Chunk> {
        match self.state {
            StreamState::Failed => return Err(DecoderError::Failed),
            StreamState::Exhausted => {
                self.chunk.clear();
                return Ok(&self.chunk);
            }
            StreamState::Open | StreamState::Draining => {}
        }
        let Some(source) = self.source.as_mut() else {
            return Err(DecoderError::Failed);
        };

        let mut chunk = Chunk::default();
        let mut records = 0usize;
        let mut input_ended = false;
        while chunk.len() < self.chunk_size {
            match source.next_record() {
                Some(Ok(record)) => {
                    let substrings = self.extractor.seq_to_kmers(&record.seq);
                    chunk.entry(record.name).or_default().extend(substrings);
                    records += 1;
                }
                Some(Err(e)) => {
                    warn!("Stream error in {}: {}", self.source_name, e);
                    self.state = StreamState::Failed;
                    self.source = None;
                    return Err(e);
                }
                None => {
                    input_ended = true;
                    break;
                }
            }
        }

        self.chunk = chunk;
        self.chunks_served += 1;
        debug!(
            "Chunk {}: {} records, {} names, {} substrings",
            self.chunks_served,
            records,
            self.chunk.len(),
            self.chunk.values().map(Vec::len).sum::<usize>()
        );

        if input_ended {
            self.state = StreamState::Exhausted;
            self.source = None;
            info!(
                "Finished {} after {} chunks",
                self.source_name, self.chunks_served
            );
        } else {
            self.state = StreamState::Draining;
        }
        Ok(&self.chunk)
    }

    /// Whether the input has been fully consumed
    pub fn end(&self) -> bool {
        self.state == StreamState::Exhausted
    }

    /// Current stream state
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Most recent chunk
    pub fn kmers(&self) -> &Chunk {
        &self.chunk
    }

    /// Take ownership of the most recent chunk, leaving it empty
    pub fn take_chunk(&mut self) -> Chunk {
        std::mem::take(&mut self.chunk)
    }

    /// Encode one pattern of length `k`
    pub fn hash_kmer(&self, kmer: &str) -> Result<u64> {
        self.extractor.hash_kmer(kmer)
    }

    /// Decode one code (reversible modes only)
    pub fn ihash_kmer(&self, code: u64) -> Result<String> {
        self.extractor.ihash_kmer(code)
    }

    /// Pattern length
    pub fn k(&self) -> usize {
        self.extractor.k()
    }

    /// Replace the hashing strategy; on error the current one is kept
    pub fn set_hashing_mode(&mut self, mode: HashMode, canonical: bool) -> Result<()> {
        self.extractor.set_hashing_mode(mode, canonical)?;
        debug!("{}: hashing switched to {} (canonical = {})", self.source_name, mode, canonical);
        Ok(())
    }

    /// Active hashing mode
    pub fn hash_mode(&self) -> HashMode {
        self.extractor.hash_mode()
    }

    /// Whether codes are strand-independent
    pub fn canonical(&self) -> bool {
        self.extractor.canonical()
    }

    /// Slicing mode name
    pub fn slicing_mode(&self) -> &'static str {
        self.extractor.slicing_mode()
    }

    /// Path of the input file, if the decoder reads one
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Records per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The extractor used for every record
    pub fn extractor(&self) -> &KmerExtractor {
        &self.extractor
    }

    /// Whether the source is still held
    pub fn is_source_open(&self) -> bool {
        self.source.is_some()
    }
}

impl<S: SequenceSource> std::fmt::Debug for Decoder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("source", &self.source_name)
            .field("extractor", &self.extractor)
            .field("chunk_size", &self.chunk_size)
            .field("state", &self.state)
            .finish()
    }
}
