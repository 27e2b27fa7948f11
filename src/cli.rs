//! The command-line surface of the solver binary.
//!
//! Uses `clap` for parsing arguments. Puzzle records always travel over
//! stdout; logging and the optional statistics report go to stderr so the
//! record protocol stays machine-readable.

use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sudoku_solver::driver::{self, RunSummary};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the solver application.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku-solver",
    version,
    about = "A streaming Sudoku validator and solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve every record in a puzzle file.
    File {
        /// Path to the puzzle file, one 81-character record per line.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.sudoku` file under a directory.
    Dir {
        /// Path to the directory to walk.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Print a statistics report to stderr once the stream is done.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,
}

/// Routes a parsed command line to the matching runner.
///
/// With no subcommand and no path the records are read from stdin, which is
/// the plain filter mode.
pub(crate) fn dispatch(cli: Cli) -> io::Result<()> {
    if let Some(path) = &cli.path {
        if cli.command.is_none() {
            return run_file(path, &cli.common);
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => run_file(&path, &common),
        Some(Commands::Dir { path, common }) => run_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            completions(shell);
            Ok(())
        }
        None => run_stdin(&cli.common),
    }
}

/// Processes records from stdin to stdout.
fn run_stdin(common: &CommonOptions) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = io::BufWriter::new(stdout.lock());
    run_stream(&mut input, &mut output, common)
}

/// Processes the records of one puzzle file to stdout.
fn run_file(path: &Path, common: &CommonOptions) -> io::Result<()> {
    log::info!("processing {}", path.display());
    let mut input = BufReader::new(File::open(path)?);
    let stdout = io::stdout();
    let mut output = io::BufWriter::new(stdout.lock());
    run_stream(&mut input, &mut output, common)
}

/// Walks a directory and processes every `.sudoku` file in path order.
fn run_dir(path: &Path, common: &CommonOptions) -> io::Result<()> {
    if !path.is_dir() {
        eprintln!("Provided path is not a directory: {}", path.display());
        std::process::exit(1);
    }

    let files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.is_file())
        .sorted()
        .collect();

    for file in files {
        if file.extension().is_none_or(|ext| ext != "sudoku") {
            log::debug!("skipping non-puzzle file: {}", file.display());
            continue;
        }
        run_file(&file, common)?;
    }

    Ok(())
}

/// Drives the record loop over one stream and reports on it.
fn run_stream<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    common: &CommonOptions,
) -> io::Result<()> {
    let started = Instant::now();
    let summary = driver::run(input, output)?;
    let elapsed = started.elapsed();

    log::debug!(
        "stream done: {} records in {:.3}s",
        summary.records,
        elapsed.as_secs_f64()
    );
    if common.stats {
        report(&summary, elapsed);
    }
    Ok(())
}

/// Writes shell completions for the requested shell to stdout.
fn completions(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "sudoku-solver", &mut io::stdout());
}

/// Helper to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl Display) {
    eprintln!("|  {label:<24} {value:>18}  |");
}

/// Helper to print a statistic line that includes a rate (value/second).
fn stat_line_with_rate(label: &str, value: u64, elapsed: f64) {
    #[allow(clippy::cast_precision_loss)]
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    eprintln!("|  {label:<16} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of stream and search statistics to stderr.
///
/// # Panics
///
/// Panics if the jemalloc statistics epoch cannot be advanced or read.
fn report(summary: &RunSummary, elapsed: Duration) {
    let elapsed_secs = elapsed.as_secs_f64();

    // Advance the epoch so the allocator figures cover the run just done.
    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    #[allow(clippy::cast_precision_loss)]
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    #[allow(clippy::cast_precision_loss)]
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    eprintln!("\n====================[ Stream Statistics ]===================");
    stat_line("Records", summary.records);
    stat_line("Solved", summary.solved);
    stat_line("Already solved", summary.already_solved);
    stat_line("No solution", summary.no_solution);
    stat_line("Errors", summary.rejected);
    eprintln!("====================[ Search Statistics ]===================");
    stat_line_with_rate("Decisions", summary.search.decisions, elapsed_secs);
    stat_line_with_rate("Backtracks", summary.search.backtracks, elapsed_secs);
    stat_line("Memory usage (MiB)", format!("{allocated_mib:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident_mib:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    eprintln!("============================================================");
}
