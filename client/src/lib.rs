//! Minesweeper Client Library
//!
//! This library provides a Rust client for the stateless minesweeper server.
//! The server keeps no games: each response carries a token holding the whole
//! game, which goes back to the server with the next move.
//!
//! ## Usage
//!
//! ### High-Level Interface (Recommended)
//!
//! `MinesweeperGame` remembers the latest token for you:
//!
//! ```rust,no_run
//! use minesweeper_client::{GameParams, MinesweeperGame};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let game = MinesweeperGame::new("http://localhost:8000")?;
//!
//!     game.start_game(GameParams { rows: 9, columns: 9, mines: 10 }).await?;
//!
//!     // row a, column a; then a flag on row b, column c
//!     game.click("aa").await?;
//!     game.flag("bc").await?;
//!
//!     if let Some(state) = game.get_state().await {
//!         println!("Game over: {}, Won: {}", state.is_game_over(), state.is_won());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Low-Level Interface
//!
//! `MinesweeperClient` maps one call to one request and leaves the token to you:
//!
//! ```rust,no_run
//! use minesweeper_client::{GameParams, MinesweeperClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = MinesweeperClient::new("http://localhost:8000")?;
//!     let started = client.start_game(GameParams::default()).await?;
//!     let next = client.click(&started.token, "ee").await?;
//!     println!("Status: {:?}", next.game.status);
//!     Ok(())
//! }
//! ```

mod client;
mod game;

pub use client::MinesweeperClient;
pub use game::{GameState, MinesweeperGame};

// Re-export common types for convenience
pub use minesweeper_common::{models::*, protocol::*};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
