use chrono::Utc;
use minesweeper_common::protocol::{ErrorResponse, GameResponse};
use minesweeper_engine::{GameEngine, GameOptions, GameState};
use rocket::{
    Request, State, catch, get,
    http::Status,
    post,
    response::status::Custom,
    serde::json::Json,
};
use tracing::{debug, error, info, warn};

use crate::{
    rate_limit::{ClientIp, RateLimiter, check_rate_limit},
    render::game_view,
};

pub type ApiError = Custom<Json<ErrorResponse>>;
pub type ApiResult = Result<Json<GameResponse>, ApiError>;

fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    Custom(status, Json(ErrorResponse::new(message)))
}

/// Renders `state` and packs it into the token for the next request.
fn respond(state: &GameState) -> ApiResult {
    let token = state.to_token().map_err(|e| {
        error!("Failed to encode game state: {}", e);
        api_error(Status::InternalServerError, "could not save the game")
    })?;

    Ok(Json(GameResponse {
        token,
        game: game_view(state, Utc::now()),
    }))
}

fn load(token: &str) -> Result<GameState, ApiError> {
    GameState::from_token(token).map_err(|e| {
        warn!("Rejected game token: {}", e);
        api_error(Status::BadRequest, "invalid game state")
    })
}

/// Applies one move. Finished games only accept the cheat code; anything
/// else hands the finished state back unchanged.
fn apply_move(token: &str, command: &str, is_click: bool) -> ApiResult {
    let mut engine = GameEngine::new(load(token)?);

    let parsed = if is_click {
        engine.parse_click_tile(command)
    } else {
        engine.parse_place_flag(command)
    };
    let mv = parsed.map_err(|e| {
        debug!("Rejected move {:?}: {}", command, e);
        api_error(Status::BadRequest, e.to_string())
    })?;

    if engine.state().is_complete() && !mv.is_cheat {
        debug!("Ignoring move on finished game");
        return respond(engine.state());
    }

    engine.update_state(mv);
    respond(engine.state())
}

/// Starts a game from a `rows,columns,mines` body; an empty body uses 9x9 with 10 mines.
#[post("/start", data = "<options>")]
pub fn start_game(
    options: String,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
) -> ApiResult {
    check_rate_limit(rate_limiter, &client_ip).map_err(|status| {
        warn!("Rate limit hit by {}", client_ip.0);
        api_error(status, "too many new games, try again in a minute")
    })?;

    let options = if options.trim().is_empty() {
        GameOptions::default()
    } else {
        options
            .parse::<GameOptions>()
            .map_err(|e| api_error(Status::BadRequest, e.to_string()))?
    };

    let state = GameEngine::create_new_game(options)
        .map_err(|e| api_error(Status::UnprocessableEntity, e.to_string()))?;
    info!("Started game {} for {}", options, client_ip.0);
    respond(&state)
}

#[get("/play/<token>")]
pub fn play(token: &str) -> ApiResult {
    respond(&load(token)?)
}

#[post("/click/<token>", data = "<command>")]
pub fn click_tile(token: &str, command: String) -> ApiResult {
    apply_move(token, &command, true)
}

#[post("/flag/<token>", data = "<command>")]
pub fn place_flag(token: &str, command: String) -> ApiResult {
    apply_move(token, &command, false)
}

#[catch(default)]
pub fn default_catcher(status: Status, request: &Request<'_>) -> ApiError {
    debug!("{} on {} {}", status, request.method(), request.uri());
    api_error(status, status.reason_lossy())
}
