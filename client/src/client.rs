use minesweeper_common::{
    models::GameParams,
    protocol::{ErrorResponse, GameResponse},
};
use reqwest::{Client, RequestBuilder};
use tracing::debug;
use url::Url;

use crate::Result;

/// HTTP client for the minesweeper server API.
///
/// The server keeps no games; every call after [`start_game`](Self::start_game)
/// needs the token from the previous response.
pub struct MinesweeperClient {
    client: Client,
    base_url: Url,
}

impl MinesweeperClient {
    /// Create a new client connecting to the specified server URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::new();

        Ok(Self { client, base_url })
    }

    /// Start a new game with the specified parameters
    pub async fn start_game(&self, params: GameParams) -> Result<GameResponse> {
        let url = self.endpoint(&["start"])?;
        self.send(self.client.post(url).body(params.to_string()))
            .await
    }

    /// Fetch the view for an existing token
    pub async fn play(&self, token: &str) -> Result<GameResponse> {
        let url = self.route_url("play", token)?;
        self.send(self.client.get(url)).await
    }

    /// Click a tile, e.g. `"ab"` for row a, column b
    pub async fn click(&self, token: &str, command: &str) -> Result<GameResponse> {
        let url = self.route_url("click", token)?;
        self.send(self.client.post(url).body(command.to_string()))
            .await
    }

    /// Place or remove a flag
    pub async fn flag(&self, token: &str, command: &str) -> Result<GameResponse> {
        let url = self.route_url("flag", token)?;
        self.send(self.client.post(url).body(command.to_string()))
            .await
    }

    /// URL of `<base>/<route>/<token>` on the server
    pub fn route_url(&self, route: &str, token: &str) -> Result<Url> {
        self.endpoint(&[route, token])
    }

    /// Appends `segments` below the base URL's path, keeping any prefix.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| "Server URL cannot carry a path")?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<GameResponse> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Server answered {}", status);

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(format!("Server rejected request ({}): {}", status, message).into());
        }

        Ok(response.json().await?)
    }
}
