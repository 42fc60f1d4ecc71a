use crate::{Axis, Board, ParseMoveError};

/// Typing this instead of a tile wins the game on the spot.
pub const CHEAT_CODE: &str = "xyzzy";

/// One player action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Move {
    pub row: u8,
    pub column: u8,
    /// `true` reveals the tile, `false` toggles its flag.
    pub is_click: bool,
    pub is_cheat: bool,
}

impl Move {
    pub const fn click(row: u8, column: u8) -> Self {
        Self {
            row,
            column,
            is_click: true,
            is_cheat: false,
        }
    }

    pub const fn flag(row: u8, column: u8) -> Self {
        Self {
            row,
            column,
            is_click: false,
            is_cheat: false,
        }
    }

    pub const fn cheat() -> Self {
        Self {
            row: 0,
            column: 0,
            is_click: true,
            is_cheat: true,
        }
    }

    /// Parses two-letter move text against `board`.
    ///
    /// Letters of the same case read as row then column. With mixed case the
    /// lowercase letter is always the row, whichever position it is in.
    pub(crate) fn parse(text: &str, board: &Board, is_click: bool) -> Result<Self, ParseMoveError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(CHEAT_CODE) {
            return Ok(Self::cheat());
        }

        let mut chars = text.chars();
        let (Some(first), Some(second), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseMoveError::WrongLength);
        };
        if !first.is_ascii_alphabetic() || !second.is_ascii_alphabetic() {
            return Err(ParseMoveError::NotAlphabetic);
        }

        let (row, column) = if first.is_ascii_uppercase() && second.is_ascii_lowercase() {
            (second, first)
        } else {
            (first, second)
        };

        let row = letter_index(row, board.height(), Axis::Row)?;
        let column = letter_index(column, board.width(), Axis::Column)?;
        Ok(Self {
            row,
            column,
            is_click,
            is_cheat: false,
        })
    }
}

fn letter_index(letter: char, limit: u8, axis: Axis) -> Result<u8, ParseMoveError> {
    // ASCII-alphabetic was checked by the caller
    let index = letter.to_ascii_uppercase() as u8 - b'A';
    if index < limit {
        Ok(index)
    } else {
        Err(ParseMoveError::OutOfRange {
            letter,
            axis,
            last: char::from(b'a' + limit - 1),
        })
    }
}
