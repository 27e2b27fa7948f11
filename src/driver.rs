//! The record-processing loop.
//!
//! Records stream through one at a time: echo the raw input, validate it,
//! run the feasibility pre-check, and only then search. Each record
//! produces its input echoed verbatim (illegal characters included) plus a
//! newline, then exactly one of:
//!
//! - the 81-character solved grid followed by a blank line;
//! - `No solution` followed by a blank line;
//! - `Error` followed by a blank line.
//!
//! Nothing is shared between records; the board lives and dies with the
//! record that produced it. Malformed records never stop the loop, only
//! genuine I/O failures do.

use crate::board::Board;
use crate::feasibility;
use crate::record::{self, Validated, ValidationFlags};
use crate::search::{Backtracker, SearchStats};
use log::debug;
use std::io::{self, BufRead, Write};

/// The terminal classification of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Validation failed; nothing was solved.
    Rejected(ValidationFlags),
    /// The record was valid but admits no completed grid.
    NoSolution,
    /// The record arrived fully solved and is emitted unchanged.
    AlreadySolved(Board),
    /// The search completed the puzzle.
    Solved(Board),
}

/// Aggregate figures for one processed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records consumed from the input.
    pub records: u64,
    /// Records rejected by validation.
    pub rejected: u64,
    /// Valid records without a solution.
    pub no_solution: u64,
    /// Records that arrived already solved.
    pub already_solved: u64,
    /// Records completed by the search.
    pub solved: u64,
    /// Search counters accumulated across all records.
    pub search: SearchStats,
}

/// Classifies one record.
///
/// Validation runs first and rejects without solving. The feasibility
/// pre-check then rules out boards with an unfillable cell before the
/// search is ever invoked, and a board that arrives full is returned as is.
#[must_use]
pub fn process_record(bytes: &[u8], solver: &mut Backtracker) -> Disposition {
    let mut board = match record::validate(bytes) {
        Validated::Invalid(flags) => return Disposition::Rejected(flags),
        Validated::Valid(board) => board,
    };
    if feasibility::has_trivial_deadend(&board) {
        return Disposition::NoSolution;
    }
    if board.is_full() {
        return Disposition::AlreadySolved(board);
    }
    if solver.solve(&mut board) {
        Disposition::Solved(board)
    } else {
        Disposition::NoSolution
    }
}

/// Processes every record in `input`, writing echoes and results to `output`.
///
/// Runs until the input is exhausted, then flushes the writer and returns
/// the aggregate figures for the stream. An empty input produces no output.
///
/// # Errors
///
/// Returns any I/O error raised while reading `input` or writing `output`.
pub fn run<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<RunSummary> {
    let mut summary = RunSummary::default();

    while let Some(bytes) = record::read_record(input)? {
        summary.records += 1;
        output.write_all(&bytes)?;
        output.write_all(b"\n")?;

        let mut solver = Backtracker::new();
        match process_record(&bytes, &mut solver) {
            Disposition::Rejected(flags) => {
                debug!("record {}: rejected ({flags:?})", summary.records);
                summary.rejected += 1;
                output.write_all(b"Error\n\n")?;
            }
            Disposition::NoSolution => {
                debug!("record {}: no solution", summary.records);
                summary.no_solution += 1;
                output.write_all(b"No solution\n\n")?;
            }
            Disposition::AlreadySolved(board) => {
                debug!("record {}: already solved", summary.records);
                summary.already_solved += 1;
                writeln!(output, "{board}\n")?;
            }
            Disposition::Solved(board) => {
                let stats = solver.stats();
                debug!(
                    "record {}: solved after {} decisions, {} backtracks",
                    summary.records, stats.decisions, stats.backtracks
                );
                summary.solved += 1;
                writeln!(output, "{board}\n")?;
            }
        }
        summary.search.merge(solver.stats());
    }

    output.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PUZZLE_17_HINT: &str =
        ".......1.4.........2...........5.4.7..8...3....1.9....3..4..2...5.1........8.6...";
    const SOLUTION_17_HINT: &str =
        "693784512487512936125963874932651487568247391741398625319475268856129743274836159";

    // An empty cell at (0, 0) sees all nine digits among the givens, so the
    // pre-check rejects this record without any search.
    const PUZZLE_DEADEND: &str =
        ".123456789............9....4..1.........2.........3.........1.........2.........3";

    // Consistent givens that survive the pre-check but admit no grid.
    const PUZZLE_UNSOLVABLE: &str =
        ".......1.5.........2...........5.4.7..8...3....1.9....3..4..2...5.1........8.6...";

    fn run_on(input: &str) -> (String, RunSummary) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let summary = run(&mut reader, &mut output).unwrap();
        (String::from_utf8(output).unwrap(), summary)
    }

    #[test]
    fn empty_input_produces_no_output() {
        let (output, summary) = run_on("");
        assert_eq!(output, "");
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn solves_and_echoes_a_unique_puzzle() {
        let (output, summary) = run_on(&format!("{PUZZLE_17_HINT}\n"));
        assert_eq!(output, format!("{PUZZLE_17_HINT}\n{SOLUTION_17_HINT}\n\n"));
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn final_record_may_end_at_eof() {
        let (output, _) = run_on(PUZZLE_17_HINT);
        assert_eq!(output, format!("{PUZZLE_17_HINT}\n{SOLUTION_17_HINT}\n\n"));
    }

    #[test]
    fn already_solved_input_is_emitted_unchanged() {
        let (output, summary) = run_on(&format!("{SOLUTION_17_HINT}\n"));
        assert_eq!(
            output,
            format!("{SOLUTION_17_HINT}\n{SOLUTION_17_HINT}\n\n")
        );
        assert_eq!(summary.already_solved, 1);
        assert_eq!(summary.solved, 0);
        assert_eq!(summary.search, SearchStats::default());
    }

    #[test]
    fn trivial_deadend_skips_the_search() {
        let (output, summary) = run_on(&format!("{PUZZLE_DEADEND}\n"));
        assert_eq!(output, format!("{PUZZLE_DEADEND}\nNo solution\n\n"));
        assert_eq!(summary.no_solution, 1);
        // The solver never ran.
        assert_eq!(summary.search, SearchStats::default());
    }

    #[test]
    fn exhausted_search_reports_no_solution() {
        let (output, summary) = run_on(&format!("{PUZZLE_UNSOLVABLE}\n"));
        assert_eq!(output, format!("{PUZZLE_UNSOLVABLE}\nNo solution\n\n"));
        assert_eq!(summary.no_solution, 1);
        assert!(summary.search.decisions > 0);
    }

    #[test]
    fn wrong_length_is_an_error_with_verbatim_echo() {
        let short = &PUZZLE_17_HINT[..80];
        let long = format!("{PUZZLE_17_HINT}.");
        let (output, summary) = run_on(&format!("{short}\n{long}\n"));
        assert_eq!(output, format!("{short}\nError\n\n{long}\nError\n\n"));
        assert_eq!(summary.rejected, 2);
    }

    #[test]
    fn too_few_hints_is_an_error_even_when_solvable() {
        let blank = ".".repeat(81);
        let (output, _) = run_on(&format!("{blank}\n"));
        assert_eq!(output, format!("{blank}\nError\n\n"));
    }

    #[test]
    fn illegal_character_is_echoed_intact() {
        let record = PUZZLE_17_HINT.replacen('.', "0", 1);
        let (output, summary) = run_on(&format!("{record}\n"));
        assert_eq!(output, format!("{record}\nError\n\n"));
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn the_stream_continues_past_bad_records() {
        let blank = ".".repeat(81);
        let input = format!("{blank}\n{PUZZLE_17_HINT}\n{PUZZLE_UNSOLVABLE}\n");
        let (output, summary) = run_on(&input);
        let expected = format!(
            "{blank}\nError\n\n{PUZZLE_17_HINT}\n{SOLUTION_17_HINT}\n\n{PUZZLE_UNSOLVABLE}\nNo solution\n\n"
        );
        assert_eq!(output, expected);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.no_solution, 1);
    }

    #[test]
    fn empty_lines_between_records_are_rejected_records() {
        let input = format!("\n{PUZZLE_17_HINT}\n");
        let (output, summary) = run_on(&input);
        assert_eq!(
            output,
            format!("\nError\n\n{PUZZLE_17_HINT}\n{SOLUTION_17_HINT}\n\n")
        );
        assert_eq!(summary.records, 2);
    }
}
