use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a player may see of one tile.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum TileView {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    /// A mine left uncovered when the game ended.
    #[serde(rename = "mine")]
    Mine,
    /// The mine that was clicked.
    #[serde(rename = "exploded")]
    Exploded,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Read-only picture of a game, rows first.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GameView {
    pub rows: u8,
    pub columns: u8,
    pub tiles: Vec<Vec<TileView>>,
    pub status: GameStatus,
    pub total_mines: u16,
    pub total_flags: u16,
    pub cleared_mines: u16,
    pub revealed_tiles: u16,
    pub remaining_tiles: u16,
    /// Percentage of safe tiles revealed.
    pub completion: f64,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub cheat: bool,
}

impl GameView {
    pub fn tile(&self, row: usize, column: usize) -> Option<TileView> {
        self.tiles.get(row)?.get(column).copied()
    }
}

/// Size and mine count for a new game.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameParams {
    pub rows: u32,
    pub columns: u32,
    pub mines: u32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            rows: 9,
            columns: 9,
            mines: 10,
        }
    }
}

/// The `rows,columns,mines` command the server's `/start` route reads.
impl fmt::Display for GameParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.rows, self.columns, self.mines)
    }
}
