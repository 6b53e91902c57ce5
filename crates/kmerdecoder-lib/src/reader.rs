//! Record sources for the streaming decoder
//!
//! A [`SequenceSource`] hands out one `(name, sequence)` record at a time.
//! [`FastxSource`] reads FASTA/FASTQ files through needletail, which
//! detects and decompresses gzip, bzip2, xz and zstd input transparently.
//! [`MemorySource`] serves records held in memory.

use crate::error::{DecoderError, Result};
use needletail::errors::ParseErrorKind;
use needletail::{parse_fastx_file, FastxReader};
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

/// One sequence record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Record name: the header up to its first whitespace
    pub name: String,
    /// Raw sequence bytes
    pub seq: Vec<u8>,
}

impl SequenceRecord {
    /// Create a new record
    pub fn new(name: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
        }
    }
}

/// Supplier of sequence records
pub trait SequenceSource {
    /// Next record, `None` at end of input
    fn next_record(&mut self) -> Option<Result<SequenceRecord>>;

    /// Where the records come from, for logs and error messages
    fn describe(&self) -> String;
}

/// First whitespace-delimited word of a header
pub fn record_name(header: &[u8]) -> String {
    let name = header
        .split(|b| b.is_ascii_whitespace())
        .next()
        .unwrap_or_default();
    String::from_utf8_lossy(name).into_owned()
}

/// FASTA/FASTQ file source with automatic decompression
///
/// An empty file is a valid input with no records.
pub struct FastxSource {
    reader: Option<Box<dyn FastxReader>>,
    path: PathBuf,
    records_read: u64,
}

impl FastxSource {
    /// Open a sequence file
    ///
    /// # Errors
    /// Returns [`DecoderError::Open`] if the file cannot be opened or is
    /// not recognised as FASTA/FASTQ.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = match parse_fastx_file(path) {
            Ok(reader) => Some(reader),
            Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => {
                tracing::debug!("{} is empty", path.display());
                None
            }
            Err(e) => {
                return Err(DecoderError::Open {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        Ok(Self {
            reader,
            path: path.to_path_buf(),
            records_read: 0,
        })
    }

    /// Path of the file being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records successfully read so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

impl SequenceSource for FastxSource {
    fn next_record(&mut self) -> Option<Result<SequenceRecord>> {
        let record = match self.reader.as_mut()?.next()? {
            Ok(record) => record,
            Err(e) => {
                return Some(Err(DecoderError::Stream {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                }))
            }
        };
        self.records_read += 1;
        Some(Ok(SequenceRecord {
            name: record_name(record.id()),
            seq: record.seq().into_owned(),
        }))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl fmt::Debug for FastxSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastxSource")
            .field("path", &self.path)
            .field("records_read", &self.records_read)
            .finish()
    }
}

/// In-memory record source
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    records: VecDeque<SequenceRecord>,
}

impl MemorySource {
    /// Serve the given records in order
    pub fn new(records: impl IntoIterator<Item = SequenceRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Records not yet served
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl SequenceSource for MemorySource {
    fn next_record(&mut self) -> Option<Result<SequenceRecord>> {
        self.records.pop_front().map(Ok)
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
