use chrono::{DateTime, Utc};
use minesweeper_common::models::{GameStatus, GameView, TileView};
use minesweeper_engine::{GameState, Tile};

/// Builds the player's view of `state` without touching it.
pub fn game_view(state: &GameState, now: DateTime<Utc>) -> GameView {
    let board = state.board();
    let complete = state.is_complete();
    let tiles = board
        .tiles()
        .chunks(usize::from(board.width()))
        .map(|row| row.iter().map(|&tile| tile_view(tile, complete)).collect())
        .collect();

    let status = match (complete, state.has_hit_mine()) {
        (false, _) => GameStatus::Playing,
        (true, true) => GameStatus::Lost,
        (true, false) => GameStatus::Won,
    };

    GameView {
        rows: board.height(),
        columns: board.width(),
        tiles,
        status,
        total_mines: state.total_mines(),
        total_flags: state.total_flags(),
        cleared_mines: state.cleared_mines(),
        revealed_tiles: state.revealed_tiles(),
        remaining_tiles: state.remaining_tiles(),
        completion: state.completion(),
        started_at: state.start_time(),
        elapsed_seconds: state.elapsed(now).num_seconds(),
        cheat: state.cheat(),
    }
}

/// Flags win over everything; hidden mines are only uncovered once the game is over.
fn tile_view(tile: Tile, complete: bool) -> TileView {
    if tile.is_flagged() {
        TileView::Flagged
    } else if !tile.is_shown() {
        if complete && tile.is_mine() {
            TileView::Mine
        } else {
            TileView::Hidden
        }
    } else if tile.is_mine() {
        TileView::Exploded
    } else {
        TileView::Revealed {
            adjacent: tile.adjacent_mines(),
        }
    }
}
