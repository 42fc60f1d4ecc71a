use rocket::{Build, Rocket};
use tracing::info;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting stateless Minesweeper server");

    let rocket = minesweeper_server::build();

    info!("🌐 Server configured with CORS, rate limiting, and routes");
    info!("📡 Endpoints: POST /start, GET /play/<token>, POST /click/<token>, POST /flag/<token>");

    rocket
}
