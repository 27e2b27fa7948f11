#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Loading and validation of puzzle records.
//!
//! A record is one line of the input stream: exactly 81 grid characters
//! drawn from `'1'` to `'9'` (given digits) and `'.'` (blanks), followed by
//! a single `'\n'`. Records are concatenated with no other separator, and
//! the final record may be terminated by end of input instead of a newline.
//!
//! Validation applies four independent rules and reports them as a flag
//! set rather than a shared error toggle, so a single record can break
//! several rules at once:
//! - every character must be a digit or `'.'`;
//! - the record must hold exactly 81 grid characters;
//! - at least 17 cells must be given, the known minimum for a uniquely
//!   solvable 9x9 puzzle;
//! - no given digit may conflict with another given in its row, column,
//!   or block.

use crate::board::{Board, Digit};
use crate::legality;
use bitflags::bitflags;
use std::io::{self, BufRead};

/// The smallest number of given digits a record may carry.
///
/// A 9x9 puzzle with 16 or fewer givens cannot have a unique solution, so
/// such records are rejected before any solving is attempted.
pub const MIN_HINTS: usize = 17;

/// The number of grid characters in a well-formed record.
pub const RECORD_LEN: usize = Board::CELLS;

bitflags! {
    /// The validation rules a record can break.
    ///
    /// Flags are checked independently and any combination may be set for a
    /// single record. A fresh value is computed per record and discarded
    /// once the record's output line has been produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ValidationFlags: u8 {
        /// A character outside `'1'..='9'` and `'.'` appeared.
        const ILLEGAL_CHARACTER = 1 << 0;
        /// The record did not hold exactly 81 grid characters.
        const WRONG_LENGTH = 1 << 1;
        /// Fewer than [`MIN_HINTS`] given digits.
        const TOO_FEW_HINTS = 1 << 2;
        /// A given digit duplicates another given in one of its groups.
        const ILLEGAL_PLACEMENT = 1 << 3;
    }
}

/// The outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    /// Every rule passed; the loaded board is ready for solving.
    Valid(Board),
    /// At least one rule failed.
    Invalid(ValidationFlags),
}

/// Reads the next record from `reader`, stripping the terminator.
///
/// Returns `Ok(None)` once the stream is exhausted. A final record ended by
/// end of input rather than `'\n'` is still returned; an empty line between
/// terminators yields an empty record, which validation will reject.
///
/// # Errors
///
/// Propagates any I/O error from the underlying reader.
pub fn read_record<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(Some(bytes))
}

/// Validates one record and, when it is clean, loads it into a [`Board`].
///
/// The character, length, and hint-count rules are checked on the raw
/// bytes. The placement rule needs a well-defined board, so it runs
/// whenever the record consists of exactly 81 legal characters, regardless
/// of the hint count.
#[must_use]
pub fn validate(bytes: &[u8]) -> Validated {
    let mut flags = ValidationFlags::empty();

    let mut hints = 0usize;
    for &byte in bytes {
        match byte {
            b'1'..=b'9' => hints += 1,
            b'.' => {}
            _ => flags |= ValidationFlags::ILLEGAL_CHARACTER,
        }
    }
    if bytes.len() != RECORD_LEN {
        flags |= ValidationFlags::WRONG_LENGTH;
    }
    if hints < MIN_HINTS {
        flags |= ValidationFlags::TOO_FEW_HINTS;
    }

    if bytes.len() == RECORD_LEN && !flags.contains(ValidationFlags::ILLEGAL_CHARACTER) {
        let board = load(bytes);
        if has_conflicting_given(&board) {
            flags |= ValidationFlags::ILLEGAL_PLACEMENT;
        }
        if flags.is_empty() {
            return Validated::Valid(board);
        }
    }

    Validated::Invalid(flags)
}

/// Loads 81 known-legal grid characters into a board, row-major.
fn load(bytes: &[u8]) -> Board {
    let mut board = Board::new();
    for (i, &byte) in bytes.iter().enumerate() {
        if let Some(digit) = Digit::from_ascii(byte) {
            board.set(i / Board::SIDE, i % Board::SIDE, digit);
        }
    }
    board
}

/// Re-checks every given digit against the legality rules.
///
/// The legality check excludes the cell itself, so a given only fails when
/// it duplicates a different given in one of its groups.
fn has_conflicting_given(board: &Board) -> bool {
    (0..Board::SIDE).any(|row| {
        (0..Board::SIDE).any(|col| {
            board
                .get(row, col)
                .is_some_and(|digit| !legality::is_legal(board, row, col, digit))
        })
    })
}
