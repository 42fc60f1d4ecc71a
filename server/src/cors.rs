use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use tracing::info;

/// Origins come from the comma-separated `CORS_ALLOWED_ORIGINS` variable.
pub fn allowed_origins() -> Vec<String> {
    let allowed_origins_env =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string());

    allowed_origins_env
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn create_cors() -> Result<rocket_cors::Cors, rocket_cors::Error> {
    let origins = allowed_origins();
    info!("CORS allowed origins: {}", origins.join(", "));

    CorsOptions {
        allowed_origins: AllowedOrigins::some_exact(&origins),
        allowed_methods: [Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Accept", "Content-Type", "X-Requested-With"]),
        allow_credentials: false,
        ..Default::default()
    }
    .to_cors()
}
