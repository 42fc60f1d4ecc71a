use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::{Board, CreateGameError, GameOptions, GameState, Move, ParseMoveError};

/// Applies player moves to one game.
#[derive(Debug, Clone)]
pub struct GameEngine {
    state: GameState,
}

impl GameEngine {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Parses move text as a click on a tile.
    pub fn parse_click_tile(&self, text: &str) -> Result<Move, ParseMoveError> {
        Move::parse(text, self.state.board(), true)
    }

    /// Parses move text as placing or removing a flag.
    pub fn parse_place_flag(&self, text: &str) -> Result<Move, ParseMoveError> {
        Move::parse(text, self.state.board(), false)
    }

    /// Applies `mv` to the board and recounts the game's aggregates.
    ///
    /// Off-board coordinates leave the game untouched. Clicking a hidden tile
    /// reveals it even when flagged; flags only hold back chording.
    #[instrument(level = "trace", skip(self), fields(row = mv.row, column = mv.column))]
    pub fn update_state(&mut self, mv: Move) {
        if mv.is_cheat {
            self.cheat();
            return;
        }

        let (row, column) = (mv.row, mv.column);
        let board = self.state.board();
        if !board.contains(row, column) {
            debug!("Ignoring move outside the board");
            return;
        }

        if mv.is_click {
            if board.is_shown(row, column) {
                if board.has_adjacent_mines(row, column) {
                    self.chord(row, column);
                }
            } else {
                self.reveal(row, column);
            }
        } else if !board.is_shown(row, column) {
            if let Some(tile) = self.state.board_mut().tile_mut(row, column) {
                tile.toggle_flag();
                debug!(flagged = tile.is_flagged(), "Toggled flag");
            }
        }

        let was_complete = self.state.is_complete();
        self.state.refresh();
        if !was_complete && self.state.is_complete() {
            if self.state.has_hit_mine() {
                info!("Game lost on move at ({}, {})", row, column);
            } else {
                info!("Game won, all safe tiles revealed");
            }
        }
    }

    /// Shows every safe tile and flips the flag on every mine.
    fn cheat(&mut self) {
        self.state.cheat = true;
        for tile in self.state.board_mut().tiles_mut() {
            if tile.is_mine() {
                tile.toggle_flag();
            } else {
                tile.mark_shown();
            }
        }
        self.state.refresh();
        info!("Cheat code used, board cleared");
    }

    /// Shows `(row, column)` and floods outward through tiles with no adjacent mines.
    ///
    /// A tile is only queued while hidden and is shown as soon as it is taken
    /// off the stack, so every tile is visited at most once.
    fn reveal(&mut self, row: u8, column: u8) {
        let board = self.state.board_mut();
        let mut pending = vec![(row, column)];
        let mut shown = 0_usize;

        while let Some((row, column)) = pending.pop() {
            let Some(tile) = board.tile_mut(row, column) else {
                continue;
            };
            if tile.is_shown() {
                continue;
            }
            tile.mark_shown();
            shown += 1;

            if tile.is_mine() || tile.adjacent_mines() > 0 {
                continue;
            }
            pending.extend(
                board
                    .neighbors(row, column)
                    .filter(|&(r, c)| !board.is_shown(r, c)),
            );
        }

        debug!(shown, "Revealed tiles");
    }

    /// Reveals the unflagged neighbors of a shown number, but only when exactly
    /// that many neighbors carry flags.
    fn chord(&mut self, row: u8, column: u8) {
        let board = self.state.board();
        let flags = board.count_adjacent_flags(row, column);
        let expected = board.adjacent_mine_count(row, column);
        if flags != expected {
            debug!(flags, expected, "Flag count does not match, not chording");
            return;
        }

        let targets: Vec<_> = board
            .neighbors(row, column)
            .filter(|&(r, c)| !board.is_shown(r, c) && !board.is_flagged(r, c))
            .collect();
        for (r, c) in targets {
            self.reveal(r, c);
        }
    }

    /// Starts a game on a freshly generated board, seeded from the OS.
    pub fn create_new_game(options: GameOptions) -> Result<GameState, CreateGameError> {
        Self::create_new_game_with_seed(options, rand::random())
    }

    /// Starts a game whose board is fully determined by `seed`.
    #[instrument(level = "trace")]
    pub fn create_new_game_with_seed(
        options: GameOptions,
        seed: u64,
    ) -> Result<GameState, CreateGameError> {
        options.validate()?;

        // validated above: sides fit in 2..=26 and mines in 1..=255
        let board = Board::generate(
            options.rows as u8,
            options.columns as u8,
            options.mines as u16,
            seed,
        )?;
        info!(
            "Created new game: {}x{} with {} mines",
            options.rows, options.columns, options.mines
        );
        Ok(GameState::new(board, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tile;

    fn engine(rows: u8, columns: u8, mines: &[(u8, u8)]) -> GameEngine {
        let board = Board::from_mine_coords(rows, columns, mines).unwrap();
        GameEngine::new(GameState::new(board, Utc::now()))
    }

    fn tile(engine: &GameEngine, row: u8, column: u8) -> Tile {
        engine.state().board().tile(row, column).unwrap()
    }

    fn shown(engine: &GameEngine) -> usize {
        let tiles = engine.state().board().tiles();
        tiles.iter().filter(|tile| tile.is_shown()).count()
    }

    #[test]
    fn clicking_a_mine_loses() {
        let mut engine = engine(3, 3, &[(1, 1)]);

        engine.update_state(Move::click(1, 1));

        assert!(engine.state().has_hit_mine());
        assert!(engine.state().is_complete());
        assert_eq!(shown(&engine), 1);
    }

    #[test]
    fn clicking_a_number_shows_only_that_tile() {
        let mut engine = engine(3, 3, &[(0, 0)]);

        engine.update_state(Move::click(1, 1));

        assert!(tile(&engine, 1, 1).is_shown());
        assert_eq!(shown(&engine), 1);
        assert!(!engine.state().is_complete());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        // the middle column is all mines, so the right side stays hidden
        let mut engine = engine(5, 5, &[(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)]);

        engine.update_state(Move::click(0, 0));

        for row in 0..5 {
            assert!(tile(&engine, row, 0).is_shown());
            assert!(tile(&engine, row, 1).is_shown());
            assert!(!tile(&engine, row, 2).is_shown());
            assert!(!tile(&engine, row, 3).is_shown());
            assert!(!tile(&engine, row, 4).is_shown());
        }
        assert_eq!(engine.state().revealed_tiles(), 10);
    }

    #[test]
    fn flood_fill_terminates_on_open_board() {
        let mut engine = engine(26, 26, &[(25, 25)]);

        engine.update_state(Move::click(0, 0));

        assert_eq!(shown(&engine), 26 * 26 - 1);
        assert!(engine.state().is_complete());
        assert!(!engine.state().has_hit_mine());
    }

    #[test]
    fn flood_fill_does_not_spread_from_numbers() {
        let mut engine = engine(3, 5, &[(1, 2)]);

        engine.update_state(Move::click(1, 0));

        // column 0 is all zeros, column 1 borders the mine
        for row in 0..3 {
            assert!(tile(&engine, row, 0).is_shown());
            assert!(tile(&engine, row, 1).is_shown());
            assert!(!tile(&engine, row, 3).is_shown());
        }
        assert_eq!(shown(&engine), 6);
    }

    #[test]
    fn flood_fill_reveals_flagged_tiles_it_reaches() {
        let mut engine = engine(4, 4, &[(3, 3)]);
        engine.update_state(Move::flag(0, 1));

        engine.update_state(Move::click(0, 0));

        assert!(tile(&engine, 0, 1).is_shown());
        assert_eq!(shown(&engine), 15);
    }

    #[test]
    fn clicking_a_flagged_tile_reveals_it() {
        let mut engine = engine(3, 3, &[(0, 0)]);
        engine.update_state(Move::flag(0, 0));

        engine.update_state(Move::click(0, 0));

        assert!(tile(&engine, 0, 0).is_shown());
        assert!(engine.state().has_hit_mine());
    }

    #[test]
    fn flag_toggles_on_hidden_tiles_only() {
        let mut engine = engine(3, 3, &[(0, 0)]);

        engine.update_state(Move::flag(2, 2));
        assert!(tile(&engine, 2, 2).is_flagged());
        assert_eq!(engine.state().total_flags(), 1);

        engine.update_state(Move::flag(2, 2));
        assert!(!tile(&engine, 2, 2).is_flagged());
        assert_eq!(engine.state().total_flags(), 0);

        engine.update_state(Move::click(1, 1));
        let before = tile(&engine, 1, 1);
        engine.update_state(Move::flag(1, 1));
        assert_eq!(tile(&engine, 1, 1), before);
    }

    #[test]
    fn off_board_moves_change_nothing() {
        let mut engine = engine(3, 3, &[(0, 0)]);
        let before = engine.state().clone();

        engine.update_state(Move::click(3, 0));
        engine.update_state(Move::flag(0, 7));

        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn clicking_a_shown_zero_does_nothing() {
        let mut engine = engine(3, 3, &[(2, 2)]);
        engine.update_state(Move::click(0, 0));
        let before = engine.state().clone();

        engine.update_state(Move::click(0, 0));

        assert_eq!(engine.state(), &before);
    }

    /// Mines at (0, 0) and (0, 2); (1, 1) shows a 2.
    fn chord_fixture() -> GameEngine {
        let mut engine = engine(3, 3, &[(0, 0), (0, 2)]);
        engine.update_state(Move::click(1, 1));
        assert_eq!(tile(&engine, 1, 1).adjacent_mines(), 2);
        engine
    }

    #[test]
    fn chord_reveals_unflagged_neighbors_on_exact_match() {
        let mut engine = chord_fixture();
        engine.update_state(Move::flag(0, 0));
        engine.update_state(Move::flag(0, 2));

        engine.update_state(Move::click(1, 1));

        for (row, column) in [(0, 1), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(tile(&engine, row, column).is_shown(), "({row}, {column})");
        }
        assert!(!tile(&engine, 0, 0).is_shown());
        assert!(!tile(&engine, 0, 2).is_shown());
        assert!(engine.state().is_complete());
        assert!(!engine.state().has_hit_mine());
    }

    #[test]
    fn chord_with_too_few_flags_changes_nothing() {
        let mut engine = chord_fixture();
        engine.update_state(Move::flag(0, 0));
        let before = engine.state().clone();

        engine.update_state(Move::click(1, 1));

        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn chord_with_too_many_flags_changes_nothing() {
        let mut engine = chord_fixture();
        engine.update_state(Move::flag(0, 0));
        engine.update_state(Move::flag(0, 2));
        engine.update_state(Move::flag(2, 1));
        let before = engine.state().clone();

        engine.update_state(Move::click(1, 1));

        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn chord_on_wrong_flags_hits_the_mine() {
        let mut engine = chord_fixture();
        engine.update_state(Move::flag(0, 0));
        engine.update_state(Move::flag(2, 1));

        engine.update_state(Move::click(1, 1));

        assert!(tile(&engine, 0, 2).is_shown());
        assert!(engine.state().has_hit_mine());
    }

    #[test]
    fn cheat_wins_immediately() {
        let mut engine = engine(4, 4, &[(0, 0), (3, 3)]);
        engine.update_state(Move::flag(3, 3));

        engine.update_state(Move::cheat());

        let state = engine.state();
        assert!(state.cheat());
        assert!(state.is_complete());
        assert!(!state.has_hit_mine());
        assert_eq!(state.revealed_tiles(), 14);
        // the flag on (3, 3) was toggled off
        assert!(tile(&engine, 0, 0).is_flagged());
        assert!(!tile(&engine, 3, 3).is_flagged());
    }

    #[test]
    fn hit_mine_stays_recorded() {
        let mut engine = engine(3, 3, &[(0, 0)]);
        engine.update_state(Move::click(0, 0));
        engine.update_state(Move::click(2, 2));

        assert!(engine.state().has_hit_mine());
    }

    #[test]
    fn parse_wrappers_stamp_move_kind() {
        let engine = engine(9, 9, &[(0, 0)]);

        assert_eq!(engine.parse_click_tile("ab"), Ok(Move::click(0, 1)));
        assert_eq!(engine.parse_place_flag("Ab"), Ok(Move::flag(1, 0)));
        assert!(engine.parse_click_tile("zz").is_err());
        assert!(engine.parse_click_tile("xyzzy").unwrap().is_cheat);
    }

    #[test]
    fn create_new_game_validates_options() {
        for options in [
            GameOptions::new(1, 9, 5),
            GameOptions::new(9, 9, 0),
            GameOptions::new(9, 9, 81),
            GameOptions::new(27, 9, 10),
        ] {
            assert!(GameEngine::create_new_game(options).is_err(), "{options}");
        }
    }

    #[test]
    fn create_new_game_builds_requested_board() {
        let state = GameEngine::create_new_game(GameOptions::new(9, 9, 10)).unwrap();

        assert_eq!(state.board().area(), 81);
        assert_eq!(state.total_mines(), 10);
        assert_eq!(state.revealed_tiles(), 0);
        assert!(!state.cheat());
        assert!(!state.is_complete());
    }

    #[test]
    fn seeded_games_share_a_board() {
        let options = GameOptions::new(12, 20, 40);
        let first = GameEngine::create_new_game_with_seed(options, 99).unwrap();
        let second = GameEngine::create_new_game_with_seed(options, 99).unwrap();

        assert_eq!(first.board(), second.board());
        assert_eq!(first.board().height(), 12);
        assert_eq!(first.board().width(), 20);
    }
}
