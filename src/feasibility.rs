//! A cheap pre-check ruling out boards with an unfillable cell.

use crate::board::{Board, Digit};
use crate::legality;

/// Returns `true` iff some empty cell admits no digit at all.
///
/// This is a necessary condition for unsolvability, not a sufficient one: a
/// board that passes may still have no solution, which only the full search
/// can establish. Runs once per record, after validation and before search.
#[must_use]
pub fn has_trivial_deadend(board: &Board) -> bool {
    board.empty_cells().any(|(row, col)| {
        !Digit::ALL
            .into_iter()
            .any(|digit| legality::is_legal(board, row, col, digit))
    })
}
