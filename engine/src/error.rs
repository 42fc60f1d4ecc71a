use thiserror::Error;

use crate::MAX_MINES;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board dimensions {width}x{height} are outside 2..=26")]
    InvalidDimensions { width: u8, height: u8 },
    #[error("{mines} mines do not fit on a board of {area} tiles")]
    TooManyMines { mines: u16, area: u16 },
    #[error("Expected {expected} tiles, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("Position ({row}, {column}) is off the board")]
    OutOfBounds { row: u8, column: u8 },
}

/// Failure to turn a state token back into a game.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Token payload could not be (de)compressed: {0}")]
    Compression(#[from] std::io::Error),
    #[error("Token payload is larger than {0} bytes")]
    Oversized(usize),
    #[error("Token payload is {0} bytes, too short for a header")]
    Truncated(usize),
    #[error("Missing '|' delimiter at offset {offset}")]
    Delimiter { offset: usize },
    #[error("Token carries an invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("Token start time {0} is out of range")]
    Timestamp(i64),
}

/// Move text that does not name a tile on the current board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Invalid move, expected {format}", format = ParseMoveError::EXPECTED_FORMAT)]
    WrongLength,
    #[error("Invalid move, expected {format}", format = ParseMoveError::EXPECTED_FORMAT)]
    NotAlphabetic,
    #[error("Invalid move, {axis} '{letter}' is past '{last}'")]
    OutOfRange { letter: char, axis: Axis, last: char },
}

impl ParseMoveError {
    pub const EXPECTED_FORMAT: &'static str =
        "two letters naming a row and a column, e.g. 'ab' (row a, column b)";
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Axis::Row => "row",
            Axis::Column => "column",
        })
    }
}

/// Game-options text that is not three comma-separated integers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid game options '{input}', expected 'rows,columns,mines'")]
pub struct ParseOptionsError {
    pub input: String,
}

/// Rejected parameters for a new game.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CreateGameError {
    #[error("Rows must be between 2 and 26, got {0}")]
    Rows(u32),
    #[error("Columns must be between 2 and 26, got {0}")]
    Columns(u32),
    #[error("Mines must be between 1 and {max}, got {0}", max = MAX_MINES)]
    MineCount(u32),
    #[error("{mines} mines leave no safe tile on a {rows}x{columns} board")]
    BoardFull { rows: u32, columns: u32, mines: u32 },
    #[error(transparent)]
    Board(#[from] BoardError),
}
