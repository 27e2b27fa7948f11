#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! The backtracking search engine.
//!
//! The solver fills a validated board by depth-first search. Each call
//! scans the board once, row-major, computing the legal digits for every
//! empty cell. Three things can come out of that scan:
//!
//! 1. Some empty cell admits no digit: the current branch is dead and the
//!    call fails without touching the board.
//! 2. No empty cells remain: the board is solved.
//! 3. Otherwise the cell with the strictly fewest candidates is selected
//!    (ties keep the earliest cell in scan order) and each of its candidate
//!    digits is tried in ascending order: place, recurse, and on failure
//!    clear the cell back to empty before the next digit.
//!
//! The search returns success upward as soon as a full board is reached,
//! keeping the placements that led there. For puzzles with several
//! solutions this yields the first one in (selected cell, ascending digit)
//! order; siblings of a successful branch are never explored.
//!
//! The board travels through the recursion as a single `&mut Board`. Every
//! call mutates exactly one cell before recursing and restores it on
//! failure, so sibling branches always start from the state they expect.

use crate::board::Board;
use crate::legality::{self, Candidates};
use log::trace;

/// Counters accumulated while solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Digits placed, including placements later retracted.
    pub decisions: u64,
    /// Placements undone after a failed branch.
    pub backtracks: u64,
}

impl SearchStats {
    /// Folds the counters of `other` into `self`.
    pub const fn merge(&mut self, other: Self) {
        self.decisions += other.decisions;
        self.backtracks += other.backtracks;
    }
}

/// What one selection scan found.
enum Scan {
    /// No empty cells remain.
    Full,
    /// Some empty cell admits no digit.
    Deadend,
    /// The most constrained empty cell and its legal digits.
    Branch {
        row: usize,
        col: usize,
        candidates: Candidates,
    },
}

/// A recursive backtracking solver with minimum-remaining-candidates cell
/// selection.
#[derive(Debug, Clone, Default)]
pub struct Backtracker {
    stats: SearchStats,
}

impl Backtracker {
    /// Creates a solver with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Attempts to fill every empty cell of `board`.
    ///
    /// Returns `true` iff a full legal grid was reached; `board` then holds
    /// the solution. On `false` the board is back in its pre-call state.
    pub fn solve(&mut self, board: &mut Board) -> bool {
        match Self::select(board) {
            Scan::Full => true,
            Scan::Deadend => false,
            Scan::Branch {
                row,
                col,
                candidates,
            } => {
                trace!(
                    "branching on ({row}, {col}) with {} candidates",
                    candidates.len()
                );
                for digit in candidates {
                    board.set(row, col, digit);
                    self.stats.decisions += 1;
                    if self.solve(board) {
                        return true;
                    }
                    board.clear(row, col);
                    self.stats.backtracks += 1;
                }
                false
            }
        }
    }

    /// Scans the board once and picks the branch cell.
    ///
    /// A zero-candidate cell aborts the scan immediately; the candidate
    /// lists of later cells are never computed for a dead branch.
    fn select(board: &Board) -> Scan {
        let mut best: Option<(usize, usize, Candidates)> = None;
        for (row, col) in board.empty_cells() {
            let candidates = legality::candidates(board, row, col);
            if candidates.is_empty() {
                return Scan::Deadend;
            }
            // Strictly smaller only, so ties keep the earliest cell.
            if best
                .as_ref()
                .is_none_or(|(_, _, found)| candidates.len() < found.len())
            {
                best = Some((row, col, candidates));
            }
        }
        best.map_or(Scan::Full, |(row, col, candidates)| Scan::Branch {
            row,
            col,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{self, Validated};
    use proptest::prelude::*;

    const PUZZLE_17_HINT: &str =
        ".......1.4.........2...........5.4.7..8...3....1.9....3..4..2...5.1........8.6...";
    const SOLUTION_17_HINT: &str =
        "693784512487512936125963874932651487568247391741398625319475268856129743274836159";

    const PUZZLE_MODERATE: &str =
        "6....894.9....61...7..4....2..61..........2...89..2.......6...5.......3.8....16..";
    const SOLUTION_MODERATE: &str =
        "625178943948326157371945862257619384463587291189432576792863415516294738834751629";

    // Consistent givens, no trivially dead cell, yet unsolvable; only the
    // full search can tell.
    const PUZZLE_UNSOLVABLE: &str =
        ".......1.5.........2...........5.4.7..8...3....1.9....3..4..2...5.1........8.6...";

    fn board_of(record: &str) -> Board {
        match record::validate(record.as_bytes()) {
            Validated::Valid(board) => board,
            Validated::Invalid(flags) => panic!("fixture rejected: {flags:?}"),
        }
    }

    #[test]
    fn solves_a_unique_17_hint_puzzle() {
        let mut board = board_of(PUZZLE_17_HINT);
        let mut solver = Backtracker::new();
        assert!(solver.solve(&mut board));
        assert_eq!(board.to_string(), SOLUTION_17_HINT);
        assert!(solver.stats().decisions >= 64);
    }

    #[test]
    fn solves_a_moderate_puzzle() {
        let mut board = board_of(PUZZLE_MODERATE);
        assert!(Backtracker::new().solve(&mut board));
        assert_eq!(board.to_string(), SOLUTION_MODERATE);
    }

    #[test]
    fn exhausted_search_restores_the_board() {
        let mut board = board_of(PUZZLE_UNSOLVABLE);
        let before = board.clone();
        let mut solver = Backtracker::new();
        assert!(!solver.solve(&mut board));
        assert_eq!(board, before);
        assert_eq!(solver.stats().decisions, solver.stats().backtracks);
    }

    #[test]
    fn full_board_succeeds_without_decisions() {
        let mut board = board_of(SOLUTION_17_HINT);
        let mut solver = Backtracker::new();
        assert!(solver.solve(&mut board));
        assert_eq!(board.to_string(), SOLUTION_17_HINT);
        assert_eq!(solver.stats(), SearchStats::default());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // Any subset of a solved grid solves back to a grid in which every
        // cell passes the legality check against the other eighty.
        #[test]
        fn solved_output_passes_legality_everywhere(mask in prop::collection::vec(any::<bool>(), 81)) {
            let full = board_of(SOLUTION_17_HINT);
            let mut board = Board::new();
            for (i, keep) in mask.iter().enumerate() {
                let (row, col) = (i / Board::SIDE, i % Board::SIDE);
                if *keep {
                    if let Some(digit) = full.get(row, col) {
                        board.set(row, col, digit);
                    }
                }
            }

            prop_assert!(Backtracker::new().solve(&mut board));
            prop_assert!(board.is_full());
            for row in 0..Board::SIDE {
                for col in 0..Board::SIDE {
                    let digit = board.get(row, col).unwrap();
                    prop_assert!(crate::legality::is_legal(&board, row, col, digit));
                }
            }
        }
    }
}
