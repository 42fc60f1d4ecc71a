//! Minesweeper rules engine.
//!
//! A game never lives on the server. Each request decodes a [`GameState`]
//! from the token the client sent back, applies one [`Move`] through the
//! [`GameEngine`], and encodes the result into the next token:
//!
//! ```
//! use minesweeper_engine::{GameEngine, GameOptions, GameState};
//!
//! let state = GameEngine::create_new_game(GameOptions::new(9, 9, 10))?;
//! let token = state.to_token()?;
//!
//! let mut engine = GameEngine::new(GameState::from_token(&token)?);
//! let mv = engine.parse_click_tile("ee")?;
//! engine.update_state(mv);
//! let next_token = engine.state().to_token()?;
//! # let _ = next_token;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use board::*;
pub use engine::*;
pub use error::*;
pub use moves::*;
pub use options::*;
pub use state::*;
pub use tile::*;

mod board;
mod codec;
mod engine;
mod error;
mod moves;
mod options;
mod state;
mod tile;
