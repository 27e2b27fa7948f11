//! # sudoku-solver
//!
//! A command-line solver for streams of 9x9 number-place puzzles.
//!
//! Each input record is one line of 81 characters from `'1'` to `'9'` (given
//! digits) and `'.'` (blanks). For every record the program echoes the input
//! and then prints the solved 81-character grid, `No solution`, or `Error`,
//! each followed by a blank line. Malformed records are reported and skipped;
//! the stream keeps going.
//!
//! ## Usage
//!
//! ```sh
//! # Filter mode: records on stdin, results on stdout
//! sudoku-solver < puzzles.txt
//!
//! # Solve a file of records
//! sudoku-solver puzzles.sudoku
//! sudoku-solver file --path puzzles.sudoku
//!
//! # Solve every .sudoku file under a directory
//! sudoku-solver dir --path puzzles/
//!
//! # Statistics report on stderr after the run
//! sudoku-solver --stats < puzzles.txt
//!
//! # Shell completions
//! sudoku-solver completions zsh
//! ```
//!
//! Diagnostics are controlled through `RUST_LOG` (see `env_logger`) and kept
//! on stderr; stdout carries nothing but the record protocol.

use clap::Parser;

mod cli;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics report.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    env_logger::init();

    let cli = cli::Cli::parse();
    if let Err(error) = cli::dispatch(cli) {
        eprintln!("I/O error: {error}");
        std::process::exit(1);
    }
}
