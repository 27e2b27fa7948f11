#![deny(missing_docs)]
//! This crate validates and solves 9x9 number-place (Sudoku) puzzles read as
//! fixed-length textual records: 81 characters from `'1'..'9'` and `'.'` per
//! line, one puzzle per line.

/// The `board` module holds the 9x9 grid model: digits, cells, and block
/// arithmetic.
pub mod board;

/// The `driver` module runs the per-record loop: echo, validate, pre-check,
/// search, and output.
pub mod driver;

/// The `feasibility` module rules out boards with an unfillable cell before
/// the search runs.
pub mod feasibility;

/// The `legality` module decides whether a digit may occupy a cell without
/// duplicating its row, column, or block.
pub mod legality;

/// The `record` module frames and validates raw puzzle records.
pub mod record;

/// The `search` module implements the backtracking solver with
/// minimum-remaining-candidates cell selection.
pub mod search;
