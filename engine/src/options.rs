use std::{fmt, str::FromStr};

use crate::{CreateGameError, MAX_SIDE, MIN_SIDE, ParseOptionsError};

/// Most mines a game may start with; the count has to fit in one byte.
pub const MAX_MINES: u32 = 255;

/// Parameters for a new game, as given by the `rows,columns,mines` command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOptions {
    pub rows: u32,
    pub columns: u32,
    pub mines: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            rows: 9,
            columns: 9,
            mines: 10,
        }
    }
}

impl GameOptions {
    pub const fn new(rows: u32, columns: u32, mines: u32) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Checks the options describe a playable board, reporting the first problem found.
    pub fn validate(&self) -> Result<(), CreateGameError> {
        let sides = u32::from(MIN_SIDE)..=u32::from(MAX_SIDE);
        if !sides.contains(&self.rows) {
            return Err(CreateGameError::Rows(self.rows));
        }
        if !sides.contains(&self.columns) {
            return Err(CreateGameError::Columns(self.columns));
        }
        if !(1..=MAX_MINES).contains(&self.mines) {
            return Err(CreateGameError::MineCount(self.mines));
        }
        if self.mines >= self.rows * self.columns {
            return Err(CreateGameError::BoardFull {
                rows: self.rows,
                columns: self.columns,
                mines: self.mines,
            });
        }
        Ok(())
    }
}

impl FromStr for GameOptions {
    type Err = ParseOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseOptionsError {
            input: s.to_string(),
        };

        let mut numbers = s.split(',').map(|part| part.trim().parse::<u32>());
        match (numbers.next(), numbers.next(), numbers.next(), numbers.next()) {
            (Some(Ok(rows)), Some(Ok(columns)), Some(Ok(mines)), None) => {
                Ok(Self::new(rows, columns, mines))
            }
            _ => Err(error()),
        }
    }
}

impl fmt::Display for GameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.rows, self.columns, self.mines)
    }
}
