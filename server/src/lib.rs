//! HTTP front end for the minesweeper engine.
//!
//! The server keeps nothing between requests: every response carries a
//! token holding the whole game, and the client sends it back with its next
//! move.

pub mod cors;
pub mod rate_limit;
pub mod render;
pub mod routes;

use rocket::{Build, Rocket, catchers, routes};
use tracing::error;

use crate::{
    rate_limit::create_rate_limiter,
    routes::{click_tile, default_catcher, place_flag, play, start_game},
};

/// Assembles the Rocket instance with every route, catcher and piece of managed state.
pub fn build() -> Rocket<Build> {
    let rocket = rocket::build()
        .manage(create_rate_limiter())
        .mount("/", routes![start_game, play, click_tile, place_flag])
        .register("/", catchers![default_catcher]);

    match cors::create_cors() {
        Ok(cors) => rocket.attach(cors),
        Err(e) => {
            error!("Invalid CORS configuration, continuing without CORS: {}", e);
            rocket
        }
    }
}
