use serde::{Deserialize, Serialize};

use crate::models::GameView;

/// Returned by every successful route: the view to draw and the token that
/// carries the game into the next request.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct GameResponse {
    pub token: String,
    pub game: GameView,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
