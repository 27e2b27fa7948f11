//! Placement legality rules.
//!
//! Every cell belongs to exactly one row, one column, and one 3x3 block. A
//! digit is legal at a cell iff it does not already occur anywhere in those
//! three groups, the cell itself excluded. The self-exclusion means a digit
//! that is already placed legally stays legal at its own cell, which is what
//! lets the validator re-check given digits in place.

use crate::board::{Board, Digit};
use smallvec::SmallVec;

/// The legal digits for one cell, inline up to the maximum of nine.
pub type Candidates = SmallVec<[Digit; 9]>;

/// Checks whether `digit` may occupy `(row, col)` without duplicating a
/// digit in the cell's row, column, or block.
///
/// Pure and allocation-free; scans at most 27 cells.
#[must_use]
pub fn is_legal(board: &Board, row: usize, col: usize, digit: Digit) -> bool {
    for k in 0..Board::SIDE {
        if k != col && board.get(row, k) == Some(digit) {
            return false;
        }
    }
    for k in 0..Board::SIDE {
        if k != row && board.get(k, col) == Some(digit) {
            return false;
        }
    }
    let (row0, col0) = Board::block_origin(row, col);
    for r in row0..row0 + Board::BLOCK {
        for c in col0..col0 + Board::BLOCK {
            if (r, c) != (row, col) && board.get(r, c) == Some(digit) {
                return false;
            }
        }
    }
    true
}

/// Collects the legal digits for `(row, col)` in ascending order.
#[must_use]
pub fn candidates(board: &Board, row: usize, col: usize) -> Candidates {
    Digit::ALL
        .into_iter()
        .filter(|&digit| is_legal(board, row, col, digit))
        .collect()
}
