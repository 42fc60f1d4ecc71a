use std::sync::Arc;

use minesweeper_common::{
    models::{GameParams, GameStatus, GameView, TileView},
    protocol::GameResponse,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{MinesweeperClient, Result};

/// Local copy of the latest server response
#[derive(Debug, Clone)]
pub struct GameState {
    pub token: String,
    pub view: GameView,
}

impl GameState {
    /// Get the tile at the specified row and column
    pub fn get_tile(&self, row: usize, column: usize) -> Option<TileView> {
        self.view.tile(row, column)
    }

    /// Check if the game is in a completed state (won or lost)
    pub fn is_game_over(&self) -> bool {
        self.view.status.is_over()
    }

    /// Check if the player has won
    pub fn is_won(&self) -> bool {
        self.view.status == GameStatus::Won
    }
}

impl From<GameResponse> for GameState {
    fn from(response: GameResponse) -> Self {
        Self {
            token: response.token,
            view: response.game,
        }
    }
}

/// High-level minesweeper client that carries the game token between moves
pub struct MinesweeperGame {
    client: MinesweeperClient,
    state: Arc<RwLock<Option<GameState>>>,
}

impl MinesweeperGame {
    /// Create a new game instance
    pub fn new(server_url: &str) -> Result<Self> {
        let client = MinesweeperClient::new(server_url)?;
        Ok(Self {
            client,
            state: Arc::new(RwLock::new(None)),
        })
    }

    /// Start a new game with the specified parameters
    pub async fn start_game(&self, params: GameParams) -> Result<()> {
        info!(
            "Starting new game: {}x{} with {} mines",
            params.rows, params.columns, params.mines
        );

        let response = self.client.start_game(params).await?;
        *self.state.write().await = Some(response.into());
        Ok(())
    }

    /// Resume a game from a token obtained earlier
    pub async fn resume(&self, token: &str) -> Result<()> {
        let response = self.client.play(token).await?;
        *self.state.write().await = Some(response.into());
        Ok(())
    }

    /// Click a tile, e.g. `"ab"`
    pub async fn click(&self, command: &str) -> Result<()> {
        debug!("Clicking {}", command);
        let token = self.require_token().await?;
        let response = self.client.click(&token, command).await?;
        *self.state.write().await = Some(response.into());
        Ok(())
    }

    /// Flag/unflag a tile
    pub async fn flag(&self, command: &str) -> Result<()> {
        debug!("Flagging {}", command);
        let token = self.require_token().await?;
        let response = self.client.flag(&token, command).await?;
        *self.state.write().await = Some(response.into());
        Ok(())
    }

    /// Get the current game state
    pub async fn get_state(&self) -> Option<GameState> {
        self.state.read().await.clone()
    }

    /// The token to send with the next move
    pub async fn token(&self) -> Option<String> {
        let state = self.state.read().await;
        state.as_ref().map(|state| state.token.clone())
    }

    async fn require_token(&self) -> Result<String> {
        self.token()
            .await
            .ok_or_else(|| "No game in progress. Call start_game() first.".into())
    }
}
