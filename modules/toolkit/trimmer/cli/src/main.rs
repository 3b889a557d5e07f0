use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use eyre::Result;
use seqtrim_trimmer_rs::{Config, InputSource, OutputTarget, Trimmer};

#[derive(Parser, Debug)]
#[command(name = "seqtrim")]
#[command(about = "Trim FASTA sequences to the regions supported by a BED coverage track", long_about = None)]
#[command(version)]
struct Cli {
    /// FASTA file to trim, plain or gzip-compressed ("-" reads stdin)
    #[arg(value_name = "SEQS.FA")]
    fasta: PathBuf,

    /// BED coverage track (5 to 9 or 12 columns)
    #[arg(value_name = "COVERAGE.BED")]
    bed: PathBuf,

    /// Output FASTA ("-" writes stdout, a .gz suffix compresses the output)
    #[arg(short = 'o', long, value_name = "FILE", default_value = "-")]
    output: PathBuf,

    /// Also write the selected regions as BED3
    #[arg(short = 'r', long, value_name = "FILE")]
    regions: Option<PathBuf>,

    /// Extend every kept region by this many bases on both sides
    #[arg(short = 'f', long, value_name = "INT", default_value_t = 0)]
    flanking: u64,

    /// Drop regions shorter than this before adding flanks
    #[arg(short = 'm', long, value_name = "INT", default_value_t = 0)]
    min_size: u64,

    /// Size of the sliding coverage window
    #[arg(short = 'w', long, value_name = "INT", default_value_t = 10)]
    window_size: u64,

    /// Fraction of the window that must be covered, in (0, 1]
    #[arg(short = 't', long, value_name = "FLOAT", default_value_t = 0.8)]
    threshold: f64,

    /// Minimum BED score of a coverage record
    #[arg(short = 'd', long, value_name = "INT", default_value_t = 1, allow_negative_numbers = true)]
    depth: i64,

    /// Keep the uncovered regions instead of the covered ones
    #[arg(short = 'c', long)]
    complement: bool,

    /// Worker threads, values <= 0 count back from the number of cores
    #[arg(short = 'j', long, value_name = "INT", default_value_t = 1, allow_negative_numbers = true)]
    threads: isize,

    /// Verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::new();
    config
        .set_flanking(cli.flanking)
        .set_min_size(cli.min_size)
        .set_window_size(cli.window_size)
        .set_threshold(cli.threshold)
        .set_depth(cli.depth)
        .set_complement(cli.complement)
        .set_threads(cli.threads);
    let trimmer = Trimmer::new(config)?;

    // stdin can't be re-read, so it is buffered for the two passes over the sequences
    let fasta = if is_stdio(&cli.fasta) {
        InputSource::buffer(io::stdin().lock())?
    } else {
        InputSource::Path(cli.fasta)
    };
    let bed = InputSource::Path(cli.bed);

    let output = if is_stdio(&cli.output) {
        OutputTarget::Sink(Box::new(io::BufWriter::new(io::stdout())))
    } else {
        OutputTarget::Path(cli.output)
    };
    let regions = cli.regions.map(OutputTarget::Path);

    let summary = trimmer.run(&fasta, &bed, output, regions)?;
    log::info!(
        "Kept {} of {} bases in {} records",
        summary.bases_written,
        summary.bases_in,
        summary.records_written
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("seqtrim: {err:#}");
            ExitCode::FAILURE
        }
    }
}
