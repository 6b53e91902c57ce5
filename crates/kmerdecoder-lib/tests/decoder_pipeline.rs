//! Integration tests for the streaming decoder
//!
//! These tests write real FASTA/FASTQ files (plain and gzip) and read them
//! back chunk by chunk through every slicing mode.

use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use kmerdecoder_lib::encoding::reverse_complement;
use kmerdecoder_lib::{
    Decoder, DecoderConfiguration, DecoderError, HashMode, SlicingMode, StreamState, Substring,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_fasta(records: &[(&str, &str)]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for (name, seq) in records {
        writeln!(file, ">{}", name)?;
        writeln!(file, "{}", seq)?;
    }
    file.flush()?;
    Ok(file)
}

/// Read every chunk; returns the chunk sizes and all results by name
fn drain(decoder: &mut Decoder) -> Result<(Vec<usize>, HashMap<String, Vec<Substring>>)> {
    let mut sizes = Vec::new();
    let mut all = HashMap::new();
    while !decoder.end() {
        decoder.next_chunk()?;
        let chunk = decoder.take_chunk();
        sizes.push(chunk.len());
        all.extend(chunk);
    }
    Ok((sizes, all))
}

fn positions(substrings: &[Substring]) -> Vec<usize> {
    substrings.iter().map(|s| s.position).collect()
}

fn texts(substrings: &[Substring]) -> Vec<&str> {
    substrings.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_fasta_kmers_in_chunks() -> Result<()> {
    let file = write_fasta(&[
        ("r1 first", "ACGTACGTAC"),
        ("r2", "TTGACCATGG"),
        ("r3", "GATTACAGAT"),
        ("r4", "CCCCCGGGGG"),
        ("r5", "ACGTTGCAAC"),
    ])?;
    let config = DecoderConfiguration::new(SlicingMode::Kmers { k: 5 })?.with_chunk_size(2);
    let mut decoder = Decoder::open(file.path(), &config)?;
    assert_eq!(decoder.file_name(), Some(file.path()));
    assert_eq!(decoder.k(), 5);

    let (sizes, all) = drain(&mut decoder)?;
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(decoder.state(), StreamState::Exhausted);
    assert!(decoder.next_chunk()?.is_empty());

    assert_eq!(all.len(), 5);
    assert!(all.contains_key("r1"));
    for substrings in all.values() {
        assert_eq!(substrings.len(), 6);
        for s in substrings {
            assert_eq!(s.code, decoder.hash_kmer(&s.text)?);
            // Canonical codes decode to the smaller strand
            let rc = String::from_utf8(reverse_complement(s.text.as_bytes()))?;
            let expected = std::cmp::min(s.text.clone(), rc);
            assert_eq!(decoder.ihash_kmer(s.code)?, expected);
        }
    }
    Ok(())
}

#[test]
fn test_gzip_fastq_input() -> Result<()> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    write!(encoder, "@read1 lane=1\nacgttgcaNNacgt\n+\nIIIIIIIIIIIIII\n")?;
    write!(encoder, "@read2\nGGGGCCCC\n+\nIIIIIIII\n")?;
    let compressed = encoder.finish()?;

    let mut file = tempfile::Builder::new().suffix(".fq.gz").tempfile()?;
    file.write_all(&compressed)?;
    file.flush()?;

    let config = DecoderConfiguration::new(SlicingMode::Kmers { k: 4 })?
        .with_hash_mode(HashMode::TwoBits, false);
    let mut decoder = Decoder::open(file.path(), &config)?;
    let (sizes, all) = drain(&mut decoder)?;
    assert_eq!(sizes, vec![2]);

    let read1 = &all["read1"];
    assert_eq!(positions(read1), vec![0, 1, 2, 3, 4, 10]);
    assert_eq!(texts(read1)[0], "ACGT");
    assert_eq!(read1[0].code, 0b00_01_10_11);
    assert_eq!(all["read2"].len(), 5);
    Ok(())
}

#[test]
fn test_skipmers_file() -> Result<()> {
    let file = write_fasta(&[("s", "ACGTACGTAC")])?;
    let config = DecoderConfiguration::new(SlicingMode::Skipmers { m: 2, n: 3, k: 6, orf: 0 })?
        .with_hash_mode(HashMode::TwoBits, false);
    let mut decoder = Decoder::open(file.path(), &config)?;
    assert_eq!(decoder.slicing_mode(), "skipmers");

    decoder.next_chunk()?;
    let chunk = decoder.kmers();
    let skipmers = &chunk["s"];
    assert_eq!(texts(skipmers), vec!["ACTAGT", "CGACTA", "GTCGAC"]);
    assert_eq!(positions(skipmers), vec![0, 1, 2]);
    for s in skipmers {
        assert_eq!(decoder.ihash_kmer(s.code)?, s.text);
    }
    Ok(())
}

#[test]
fn test_minimizers_file() -> Result<()> {
    let file = write_fasta(&[("m", "tcgtaacg")])?;
    let config = DecoderConfiguration::new(SlicingMode::Minimizers { k: 3, w: 3 })?;
    let mut decoder = Decoder::open(file.path(), &config)?;
    let chunk = decoder.next_chunk()?;
    let minimizers = &chunk["m"];
    assert_eq!(texts(minimizers), vec!["CGT", "AAC"]);
    assert_eq!(positions(minimizers), vec![1, 4]);
    Ok(())
}

#[test]
fn test_amino_acid_file() -> Result<()> {
    let file = write_fasta(&[("prot", "MKVLWXACDE")])?;
    let config = DecoderConfiguration::new(SlicingMode::AminoAcidKmers { k: 3 })?;
    let mut decoder = Decoder::open(file.path(), &config)?;
    assert_eq!(decoder.hash_mode(), HashMode::AminoAcid);

    decoder.next_chunk()?;
    let kmers = &decoder.kmers()["prot"];
    assert_eq!(positions(kmers), vec![0, 1, 2, 6, 7]);
    for s in kmers {
        assert_eq!(decoder.ihash_kmer(s.code)?, s.text);
    }
    assert!(decoder.set_hashing_mode(HashMode::Murmur, false).is_err());
    Ok(())
}

#[test]
fn test_one_way_modes() -> Result<()> {
    let long = "ACGT".repeat(12);
    let file = write_fasta(&[("long", long.as_str())])?;
    // Too long to pack into 64 bits
    assert!(DecoderConfiguration::new(SlicingMode::Kmers { k: 40 }).is_err());
    let config = DecoderConfiguration {
        slicing: SlicingMode::Kmers { k: 40 },
        ..DecoderConfiguration::default()
    }
    .with_hash_mode(HashMode::BigKmer, false);

    let mut decoder = Decoder::open(file.path(), &config)?;
    let kmers = decoder.next_chunk()?["long"].clone();
    assert_eq!(kmers.len(), 9);
    // Same text, same code
    assert_eq!(kmers[0].code, kmers[4].code);
    assert_eq!(kmers[0].code, decoder.hash_kmer(&kmers[0].text)?);
    assert!(matches!(
        decoder.ihash_kmer(kmers[0].code),
        Err(DecoderError::UnsupportedOperation { .. })
    ));
    Ok(())
}

#[test]
fn test_empty_file_yields_one_empty_chunk() -> Result<()> {
    let file = NamedTempFile::new()?;
    let config = DecoderConfiguration::new(SlicingMode::Kmers { k: 5 })?;
    let mut decoder = Decoder::open(file.path(), &config)?;
    assert_eq!(decoder.state(), StreamState::Open);

    assert!(decoder.next_chunk()?.is_empty());
    assert!(decoder.end());
    assert!(decoder.next_chunk()?.is_empty());
    Ok(())
}

#[test]
fn test_empty_gzip_file() -> Result<()> {
    let compressed = GzEncoder::new(Vec::new(), Compression::default()).finish()?;
    let mut file = tempfile::Builder::new().suffix(".fa.gz").tempfile()?;
    file.write_all(&compressed)?;
    file.flush()?;

    let config = DecoderConfiguration::new(SlicingMode::Minimizers { k: 5, w: 4 })?;
    let mut decoder = Decoder::open(file.path(), &config)?;
    let (sizes, all) = drain(&mut decoder)?;
    assert_eq!(sizes, vec![0]);
    assert!(all.is_empty());
    Ok(())
}

#[test]
fn test_open_errors() {
    let config = DecoderConfiguration::default();
    assert!(matches!(
        Decoder::open("/nonexistent/reads.fa", &config),
        Err(DecoderError::Open { .. })
    ));

    // Configuration is checked before the file is touched
    let config = DecoderConfiguration::default().with_chunk_size(0);
    assert_eq!(
        Decoder::open("/nonexistent/reads.fa", &config).unwrap_err(),
        DecoderError::InvalidChunkSize
    );
    let config = DecoderConfiguration::default().with_hash_mode(HashMode::AminoAcid, false);
    assert!(matches!(
        Decoder::open("/nonexistent/reads.fa", &config),
        Err(DecoderError::IncompatibleHashMode { .. })
    ));
}
