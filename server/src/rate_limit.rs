use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use tracing::debug;

/// Requests allowed per client, refilled once per interval.
#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_rate: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32, refill_interval: Duration) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_rate,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let intervals = elapsed.as_secs() / self.refill_interval.as_secs().max(1);

        if intervals > 0 {
            let tokens_to_add = (intervals as u32).saturating_mul(self.refill_rate);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.capacity);
            self.last_refill = now;
        }
    }
}

/// Game-creation budget per client address. Moves are not limited.
pub type RateLimiter = DashMap<IpAddr, TokenBucket>;

pub fn create_rate_limiter() -> RateLimiter {
    DashMap::new()
}

/// New games a client may start per minute, from `RATE_LIMIT_GAMES_PER_MINUTE`.
pub fn games_per_minute() -> u32 {
    env::var("RATE_LIMIT_GAMES_PER_MINUTE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(10)
}

/// Whether `X-Forwarded-For` / `X-Real-IP` name the client, from `TRUST_PROXY_HEADERS`.
///
/// Off unless set to `1` or `true`; only enable it behind a proxy that
/// overwrites those headers.
pub fn trust_proxy_headers() -> bool {
    env::var("TRUST_PROXY_HEADERS")
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false)
}

/// Client address announced by a reverse proxy, first hop wins.
fn forwarded_ip(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Option<IpAddr> {
    forwarded_for
        .and_then(|header| header.split(',').next())
        .and_then(|ip| ip.trim().parse().ok())
        .or_else(|| real_ip.and_then(|ip| ip.trim().parse().ok()))
}

pub struct ClientIp(pub IpAddr);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let forwarded = if trust_proxy_headers() {
            let headers = req.headers();
            forwarded_ip(
                headers.get_one("X-Forwarded-For"),
                headers.get_one("X-Real-IP"),
            )
        } else {
            None
        };
        let ip = forwarded
            .or_else(|| req.remote().map(|addr| addr.ip()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        request::Outcome::Success(ClientIp(ip))
    }
}

/// Drops buckets that have refilled completely; they hold nothing a fresh one wouldn't.
fn prune_idle(rate_limiter: &RateLimiter) {
    rate_limiter.retain(|_, bucket| {
        bucket.refill();
        bucket.tokens < bucket.capacity
    });
}

pub fn check_rate_limit(rate_limiter: &RateLimiter, client_ip: &ClientIp) -> Result<(), Status> {
    let capacity = games_per_minute();
    let refill_interval = Duration::from_secs(60);
    let refill_rate = capacity;

    prune_idle(rate_limiter);

    let mut entry = rate_limiter
        .entry(client_ip.0)
        .or_insert_with(|| TokenBucket::new(capacity, refill_rate, refill_interval));

    if entry.try_consume() {
        Ok(())
    } else {
        debug!("{} is out of game-creation tokens", client_ip.0);
        Err(Status::TooManyRequests)
    }
}
