use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use kmerdecoder_lib::{
    Decoder, DecoderConfiguration, HashMode, HashStrategy, SlicingMode,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "kmerdecoder")]
#[command(version = "0.1.0")]
#[command(about = "Extract and encode k-mers, skip-mers, minimizers and amino-acid k-mers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Kmers,
    Skipmers,
    Minimizers,
    AaKmers,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract encoded substrings from FASTA/FASTQ files
    Extract {
        /// Input FASTA/FASTQ files (optionally compressed)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Extraction algorithm
        #[arg(long, value_enum, default_value = "kmers")]
        mode: Mode,

        /// Pattern length
        #[arg(short, long)]
        k: usize,

        /// Skip-mers: bases kept per cycle
        #[arg(short, long, default_value = "2")]
        m: usize,

        /// Skip-mers: cycle length
        #[arg(short, long, default_value = "3")]
        n: usize,

        /// Minimizers: k-mers per window
        #[arg(short, long, default_value = "10")]
        w: usize,

        /// Skip-mers: 1-based reading frame (0 = all frames)
        #[arg(long, default_value = "0")]
        orf: u8,

        /// Hashing mode (0: Murmur, 1: Integer, 2: TwoBits, 3: BigKmer)
        #[arg(long, default_value = "1")]
        hash_mode: i32,

        /// Map a k-mer and its reverse complement to the same code
        #[arg(long, default_value = "true", action = ArgAction::Set)]
        canonical: bool,

        /// Records per chunk
        #[arg(long, default_value = "1000")]
        chunk_size: usize,

        /// Directory for per-file `<stem>.tsv` output (stdout if omitted)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Number of threads (0 = all available cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },

    /// Print the code of each k-mer
    Encode {
        /// K-mers to encode (all of the same length)
        #[arg(required = true)]
        kmers: Vec<String>,

        /// Hashing mode (0: Murmur, 1: Integer, 2: TwoBits, 3: BigKmer)
        #[arg(long, default_value = "1")]
        hash_mode: i32,

        /// Map a k-mer and its reverse complement to the same code
        #[arg(long, default_value = "true", action = ArgAction::Set)]
        canonical: bool,

        /// Encode amino-acid k-mers instead of nucleotides
        #[arg(long)]
        protein: bool,
    },

    /// Decode codes back to k-mers (reversible modes only)
    Decode {
        /// Pattern length
        #[arg(short, long)]
        k: usize,

        /// Codes to decode
        #[arg(required = true)]
        codes: Vec<u64>,

        /// Hashing mode (0: Murmur, 1: Integer, 2: TwoBits, 3: BigKmer)
        #[arg(long, default_value = "1")]
        hash_mode: i32,

        /// Codes were produced in canonical mode
        #[arg(long, default_value = "true", action = ArgAction::Set)]
        canonical: bool,

        /// Decode amino-acid k-mers instead of nucleotides
        #[arg(long)]
        protein: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            mode,
            k,
            m,
            n,
            w,
            orf,
            hash_mode,
            canonical,
            chunk_size,
            output_dir,
            threads,
        } => {
            let slicing = slicing_mode(mode, k, m, n, w, orf);
            let config = configuration(slicing, hash_mode, canonical, chunk_size)?;
            extract_command(&input, &config, output_dir.as_deref(), threads)?;
        }
        Commands::Encode {
            kmers,
            hash_mode,
            canonical,
            protein,
        } => {
            let mut out = std::io::stdout().lock();
            for line in encode_kmers(&kmers, hash_mode, canonical, protein)? {
                writeln!(out, "{}", line)?;
            }
        }
        Commands::Decode {
            k,
            codes,
            hash_mode,
            canonical,
            protein,
        } => {
            let mut out = std::io::stdout().lock();
            for line in decode_codes(k, &codes, hash_mode, canonical, protein)? {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}

fn slicing_mode(mode: Mode, k: usize, m: usize, n: usize, w: usize, orf: u8) -> SlicingMode {
    match mode {
        Mode::Kmers => SlicingMode::Kmers { k },
        Mode::Skipmers => SlicingMode::Skipmers { m, n, k, orf },
        Mode::Minimizers => SlicingMode::Minimizers { k, w },
        Mode::AaKmers => SlicingMode::AminoAcidKmers { k },
    }
}

/// Build and validate a configuration; protein slicing always uses amino-acid hashing
fn configuration(
    slicing: SlicingMode,
    hash_mode: i32,
    canonical: bool,
    chunk_size: usize,
) -> anyhow::Result<DecoderConfiguration> {
    let mut config = DecoderConfiguration::new(slicing)
        .with_context(|| format!("Invalid slicing parameters {:?}", slicing))?
        .with_chunk_size(chunk_size);
    if !matches!(slicing, SlicingMode::AminoAcidKmers { .. }) {
        config = config.with_hash_mode(HashMode::try_from(hash_mode)?, canonical);
    }
    config.validate().context("Invalid decoder configuration")?;
    Ok(config)
}

/// Extract every input, one decoder per file
fn extract_command(
    inputs: &[PathBuf],
    config: &DecoderConfiguration,
    output_dir: Option<&Path>,
    threads: usize,
) -> anyhow::Result<()> {
    config.print();

    let Some(output_dir) = output_dir else {
        if inputs.len() > 1 {
            bail!("--output-dir is required when extracting more than one file");
        }
        let out = BufWriter::new(std::io::stdout().lock());
        let rows = extract_file(&inputs[0], config, out)?;
        info!("Wrote {} rows", rows);
        return Ok(());
    };

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    // num_threads == 0 means "all cores" (rayon default)
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to create thread pool")?;

    let rows: u64 = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let output = output_path(input, output_dir);
                let file = File::create(&output)
                    .with_context(|| format!("Failed to create {}", output.display()))?;
                let rows = extract_file(input, config, BufWriter::new(file))?;
                info!("{} -> {} ({} rows)", input.display(), output.display(), rows);
                Ok(rows)
            })
            .collect::<anyhow::Result<Vec<u64>>>()
            .map(|counts| counts.into_iter().sum())
    })?;

    info!("Extracted {} files, {} rows in total", inputs.len(), rows);
    Ok(())
}

/// `<output_dir>/<stem>.tsv`, with compression suffixes stripped from the stem
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let mut stem = name.as_str();
    for suffix in [".gz", ".bz2", ".xz", ".zst"] {
        stem = stem.strip_suffix(suffix).unwrap_or(stem);
    }
    let stem = Path::new(stem)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.to_string());
    output_dir.join(format!("{}.tsv", stem))
}

/// Stream one file through a decoder, writing `name\tsubstring\tcode` rows
fn extract_file<W: Write>(
    input: &Path,
    config: &DecoderConfiguration,
    mut out: W,
) -> anyhow::Result<u64> {
    let mut decoder = Decoder::open(input, config)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let mut rows = 0u64;
    while !decoder.end() {
        let chunk = decoder
            .next_chunk()
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let mut names: Vec<&String> = chunk.keys().collect();
        names.sort();
        for name in names {
            for substring in &chunk[name] {
                writeln!(out, "{}\t{}\t{}", name, substring.text, substring.code)?;
                rows += 1;
            }
        }
        debug!("{}: {} rows so far", input.display(), rows);
    }
    out.flush()?;
    Ok(rows)
}

fn strategy(k: usize, hash_mode: i32, canonical: bool, protein: bool) -> anyhow::Result<HashStrategy> {
    let mode = if protein {
        HashMode::AminoAcid
    } else {
        HashMode::try_from(hash_mode)?
    };
    Ok(HashStrategy::new(mode, k, canonical)?)
}

/// `kmer\tcode` lines
fn encode_kmers(
    kmers: &[String],
    hash_mode: i32,
    canonical: bool,
    protein: bool,
) -> anyhow::Result<Vec<String>> {
    let Some(first) = kmers.first() else {
        return Ok(Vec::new());
    };
    let hasher = strategy(first.len(), hash_mode, canonical, protein)?;
    kmers
        .iter()
        .map(|kmer| {
            let code = hasher
                .try_encode(kmer.as_bytes())
                .with_context(|| format!("Cannot encode {}", kmer))?;
            Ok(format!("{}\t{}", kmer, code))
        })
        .collect()
}

/// `code\tkmer` lines
fn decode_codes(
    k: usize,
    codes: &[u64],
    hash_mode: i32,
    canonical: bool,
    protein: bool,
) -> anyhow::Result<Vec<String>> {
    let hasher = strategy(k, hash_mode, canonical, protein)?;
    codes
        .iter()
        .map(|&code| {
            let kmer = hasher
                .decode(code)
                .with_context(|| format!("Cannot decode {}", code))?;
            Ok(format!("{}\t{}", code, kmer))
        })
        .collect()
}
