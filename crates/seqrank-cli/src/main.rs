use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use seqrank_lib::alphabet::{Alphabet, AlphabetKind};
use seqrank_lib::encoding;
use seqrank_lib::{DuplicatePolicy, EncoderConfig, KmerEncoder, MinimizerConfig, SeedFamily, WinnowingMinimizer};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod parse;

use parse::{parse_sequences, Record};

#[derive(Parser, Debug)]
#[command(name = "seqrank")]
#[command(version)]
#[command(about = "Alphabet conversions, k-mer hashes and minimizers for sequence files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Input FASTA/FASTQ file (may be gzipped)
    #[arg(short, long)]
    input: PathBuf,

    /// Alphabet name (see `seqrank alphabets`)
    #[arg(short, long, default_value = "dna5")]
    alphabet: AlphabetKind,

    /// Process FASTQ quality strings instead of sequences
    #[arg(short, long)]
    quality: bool,
}

#[derive(Args, Debug, Clone)]
struct HashArgs {
    /// K-mer length
    #[arg(short, long)]
    k: usize,

    /// Seed XORed into every hash
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Report forward hashes even for complementing alphabets
    #[arg(long)]
    no_canonical: bool,
}

impl HashArgs {
    fn encoder_config(&self) -> anyhow::Result<EncoderConfig> {
        Ok(EncoderConfig::new(self.k)?
            .with_seed(self.seed)
            .with_canonical(!self.no_canonical))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in alphabets
    Alphabets,

    /// Print the rank sequence of each record
    Ranks {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write records with every symbol replaced by its canonical form
    Normalize {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write the reverse complement of each record
    Revcomp {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Report the first symbol of each record that is not in the alphabet
    Verify {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the rolling hash of every k-mer
    Kmers {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        hash: HashArgs,
    },

    /// Print winnowing minimizers
    Minimizers {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        hash: HashArgs,

        /// Window size in k-mers
        #[arg(short, long)]
        w: usize,

        /// Report a minimizer only when its hash differs from the previous one
        #[arg(long, conflicts_with = "every_window")]
        dedup: bool,

        /// Report the minimum of every window
        #[arg(long)]
        every_window: bool,

        /// Number of independently seeded minimizer schemes
        #[arg(long, default_value = "1")]
        families: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing: use RUST_LOG if set, otherwise default to info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut failed = 0;
    match cli.command {
        Commands::Alphabets => alphabets_command(&mut out)?,
        Commands::Ranks { input } => ranks_command(&input, &mut out)?,
        Commands::Normalize { input } => normalize_command(&input, &mut out)?,
        Commands::Revcomp { input } => revcomp_command(&input, &mut out)?,
        Commands::Verify { input } => failed = verify_command(&input, &mut out)?,
        Commands::Kmers { input, hash } => kmers_command(&input, &hash, &mut out)?,
        Commands::Minimizers {
            input,
            hash,
            w,
            dedup,
            every_window,
            families,
        } => {
            let policy = duplicate_policy(dedup, every_window);
            minimizers_command(&input, &hash, w, policy, families, &mut out)?;
        }
    }

    out.flush()?;
    if failed > 0 {
        bail!("{} record(s) contain symbols outside the alphabet", failed);
    }
    Ok(())
}

fn duplicate_policy(dedup: bool, every_window: bool) -> DuplicatePolicy {
    if every_window {
        DuplicatePolicy::EveryWindow
    } else if dedup {
        DuplicatePolicy::Suppressed
    } else {
        DuplicatePolicy::Allowed
    }
}

/// Run `f` on the sequence (or quality string) of every input record
fn for_each_record<F>(input: &InputArgs, mut f: F) -> anyhow::Result<usize>
where
    F: FnMut(&Record<'_>, &[u8]) -> anyhow::Result<()>,
{
    debug!(
        "Reading {} with alphabet {}",
        input.input.display(),
        input.alphabet
    );
    parse_sequences(&input.input, |record| {
        let symbols = if input.quality {
            record
                .qual
                .with_context(|| format!("record '{}' has no quality string", record.name()))?
        } else {
            record.seq
        };
        f(&record, symbols)
    })
}

fn write_fasta<W: Write>(out: &mut W, id: &[u8], seq: &[u8]) -> io::Result<()> {
    out.write_all(b">")?;
    out.write_all(id)?;
    out.write_all(b"\n")?;
    out.write_all(seq)?;
    out.write_all(b"\n")
}

/// Space separated ranks followed by a newline
fn write_ranks<W: Write>(out: &mut W, ranks: &[u8]) -> io::Result<()> {
    for (i, rank) in ranks.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{}", rank)?;
    }
    out.write_all(b"\n")
}

/// List the built-in alphabets
fn alphabets_command<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "name\tsigma\tcomplement\tambiguous\tsymbols")?;
    for kind in AlphabetKind::ALL {
        let table = kind.table();
        let ambiguous: String = table
            .ambiguous_bases()
            .iter()
            .map(|&r| char::from(table.rank_to_char(r)))
            .collect();
        let symbols: String = table.symbols().map(|(_, c)| char::from(c)).collect();
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            kind,
            table.size(),
            if table.complement().is_some() { "yes" } else { "no" },
            if ambiguous.is_empty() { "-" } else { ambiguous.as_str() },
            symbols,
        )?;
    }
    Ok(())
}

/// Print ranks as space separated integers under a FASTA-style header
fn ranks_command<W: Write>(input: &InputArgs, out: &mut W) -> anyhow::Result<()> {
    let alphabet = input.alphabet.table();
    let mut ranks = Vec::new();
    let n = for_each_record(input, |record, symbols| {
        ranks.resize(symbols.len(), 0);
        encoding::char_to_rank_into(alphabet, symbols, &mut ranks)?;
        writeln!(out, ">{}", record.name())?;
        write_ranks(out, &ranks)?;
        Ok(())
    })?;
    info!("Converted {} records", n);
    Ok(())
}

fn normalize_command<W: Write>(input: &InputArgs, out: &mut W) -> anyhow::Result<()> {
    let alphabet = input.alphabet.table();
    let mut normalized = Vec::new();
    let n = for_each_record(input, |record, symbols| {
        normalized.resize(symbols.len(), 0);
        encoding::normalize_char_into(alphabet, symbols, &mut normalized)?;
        write_fasta(out, record.id, &normalized)?;
        Ok(())
    })?;
    info!("Normalized {} records", n);
    Ok(())
}

fn revcomp_command<W: Write>(input: &InputArgs, out: &mut W) -> anyhow::Result<()> {
    let alphabet = input.alphabet.table();
    let Some(comp) = alphabet.complement() else {
        bail!("alphabet '{}' has no complement", alphabet.name());
    };
    let mut revcomp = Vec::new();
    let n = for_each_record(input, |record, symbols| {
        revcomp.resize(symbols.len(), 0);
        encoding::reverse_complement_char_into(comp, symbols, &mut revcomp)?;
        write_fasta(out, record.id, &revcomp)?;
        Ok(())
    })?;
    info!("Reverse complemented {} records", n);
    Ok(())
}

/// Returns the number of records with unknown symbols
fn verify_command<W: Write>(input: &InputArgs, out: &mut W) -> anyhow::Result<usize> {
    let alphabet = input.alphabet.table();
    let mut failed = 0;
    let n = for_each_record(input, |record, symbols| {
        if let Some(pos) = encoding::verify_char_with(alphabet, symbols) {
            failed += 1;
            writeln!(
                out,
                "{}\t{}\t{:?}",
                record.name(),
                pos,
                char::from(symbols[pos])
            )?;
        }
        Ok(())
    })?;
    if failed > 0 {
        warn!("{} of {} records failed verification against {}", failed, n, alphabet.name());
    } else {
        info!("All {} records verified against {}", n, alphabet.name());
    }
    Ok(failed)
}

/// Print `record  position  hash` for every k-mer
fn kmers_command<W: Write>(input: &InputArgs, hash: &HashArgs, out: &mut W) -> anyhow::Result<()> {
    let alphabet = input.alphabet.table();
    let config = hash.encoder_config()?;
    config.print();

    let mut ranks = Vec::new();
    let mut total = 0usize;
    let n = for_each_record(input, |record, symbols| {
        ranks.resize(symbols.len(), 0);
        encoding::char_to_rank_into(alphabet, symbols, &mut ranks)?;
        let name = record.name();
        let kmers = KmerEncoder::with_config(alphabet, &ranks, &config)?;
        for (pos, value) in kmers.enumerate() {
            writeln!(out, "{}\t{}\t{}", name, pos, value)?;
            total += 1;
        }
        Ok(())
    })?;
    info!("Hashed {} k-mers from {} records", total, n);
    Ok(())
}

/// Print `record  family  position  hash` for every reported minimizer
fn minimizers_command<W: Write>(
    input: &InputArgs,
    hash: &HashArgs,
    w: usize,
    policy: DuplicatePolicy,
    families: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    if families == 0 {
        bail!("--families must be at least 1");
    }
    let alphabet = input.alphabet.table();
    let base = MinimizerConfig {
        encoder: hash.encoder_config()?,
        w,
        duplicates: policy,
    };
    base.validate()?;
    base.print();

    let seeds = SeedFamily::new(hash.seed).seeds(families);
    info!("  families = {}", families);

    let mut ranks = Vec::new();
    let mut total = 0usize;
    let n = for_each_record(input, |record, symbols| {
        ranks.resize(symbols.len(), 0);
        encoding::char_to_rank_into(alphabet, symbols, &mut ranks)?;
        let name = record.name();
        for (family, &seed) in seeds.iter().enumerate() {
            let config = base.clone().with_seed(seed);
            let minimizers = WinnowingMinimizer::with_config(alphabet, &ranks, &config)?;
            for info in minimizers.infos() {
                writeln!(out, "{}\t{}\t{}\t{}", name, family, info.position, info.value)?;
                total += 1;
            }
        }
        Ok(())
    })?;
    info!("Reported {} minimizers from {} records", total, n);
    Ok(())
}
