use chrono::{DateTime, Duration, Utc};

use crate::Board;

/// A game in progress: the board plus the facts derived from it.
///
/// The counters are never tracked incrementally. [`GameState::refresh`]
/// rescans the whole board after every change, so they always match the
/// tile bits.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    start_time: DateTime<Utc>,
    pub(crate) cheat: bool,
    total_mines: u16,
    revealed_tiles: u16,
    total_flags: u16,
    cleared_mines: u16,
    has_hit_mine: bool,
}

impl GameState {
    /// Wraps `board`, with `start_time` truncated to whole milliseconds.
    pub fn new(board: Board, start_time: DateTime<Utc>) -> Self {
        let start_time =
            DateTime::from_timestamp_millis(start_time.timestamp_millis()).unwrap_or(start_time);
        let mut state = Self {
            board,
            start_time,
            cheat: false,
            total_mines: 0,
            revealed_tiles: 0,
            total_flags: 0,
            cleared_mines: 0,
            has_hit_mine: false,
        };
        state.refresh();
        state
    }

    /// Recounts every aggregate from the board.
    ///
    /// `has_hit_mine` only ever turns on.
    pub fn refresh(&mut self) {
        self.total_mines = 0;
        self.revealed_tiles = 0;
        self.total_flags = 0;
        self.cleared_mines = 0;

        for tile in self.board.tiles() {
            if tile.is_mine() {
                self.total_mines += 1;
            }
            if tile.is_shown() {
                self.revealed_tiles += 1;
                if tile.is_mine() {
                    self.has_hit_mine = true;
                }
            }
            if tile.is_flagged() {
                self.total_flags += 1;
                if tile.is_mine() {
                    self.cleared_mines += 1;
                }
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Whether the board was solved with the cheat code during this request.
    pub fn cheat(&self) -> bool {
        self.cheat
    }

    /// The game is over: a mine went off, or every safe tile is showing.
    pub fn is_complete(&self) -> bool {
        self.has_hit_mine || self.has_uncovered_all_safe_tiles()
    }

    pub fn has_hit_mine(&self) -> bool {
        self.has_hit_mine
    }

    pub fn has_uncovered_all_safe_tiles(&self) -> bool {
        self.revealed_tiles == self.safe_tiles()
    }

    pub fn total_mines(&self) -> u16 {
        self.total_mines
    }

    /// Tiles currently showing, mines included.
    pub fn revealed_tiles(&self) -> u16 {
        self.revealed_tiles
    }

    pub fn total_flags(&self) -> u16 {
        self.total_flags
    }

    /// Flags sitting on actual mines.
    pub fn cleared_mines(&self) -> u16 {
        self.cleared_mines
    }

    pub fn safe_tiles(&self) -> u16 {
        self.board.area() - self.total_mines
    }

    pub fn remaining_tiles(&self) -> u16 {
        self.safe_tiles().saturating_sub(self.revealed_tiles)
    }

    /// Mines not yet accounted for by a flag. Negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.total_mines) - i32::from(self.total_flags)
    }

    /// Share of safe tiles revealed, in percent.
    pub fn completion(&self) -> f64 {
        match self.safe_tiles() {
            0 => 100.0,
            safe => f64::from(self.revealed_tiles) / f64::from(safe) * 100.0,
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.start_time)
    }
}
