//! HTTP move service over the REST API.

use super::error::ServiceError;
use super::types::{BuildStatus, Chances, Envelope, NextMove};
use super::MoveService;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

const STATUS_PATH: &str = "/api/maps/status";
const BUILD_PATH: &str = "/api/maps/build";
const NEXT_MOVE_PATH: &str = "/api/next-move";
const CHANCES_PATH: &str = "/api/chances";

/// Move service reached over HTTP.
#[derive(Debug, Clone)]
pub struct RestMoveService {
    base_url: String,
    client: reqwest::Client,
}

impl RestMoveService {
    /// Creates a client for the service at `base_url`.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, ?timeout, "Created REST move service client");
        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, game: &str) -> Result<Url, ServiceError> {
        Url::parse_with_params(&format!("{}{}", self.base_url, path), &[("game", game)]).map_err(
            |e| {
                error!(error = %e, base_url = %self.base_url, "Invalid service URL");
                ServiceError::new(format!("Bad service URL: {}", e))
            },
        )
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, game: &str) -> Result<T, ServiceError> {
        let url = self.url(path, game)?;
        debug!(%url, "GET");

        let envelope: Envelope<T> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl MoveService for RestMoveService {
    #[instrument(skip(self))]
    async fn build_status(&self, game: &str) -> Result<BuildStatus, ServiceError> {
        let status: BuildStatus = self.get_data(STATUS_PATH, game).await?;
        debug!(progress = status.progress, "Got build status");
        Ok(status)
    }

    #[instrument(skip(self))]
    async fn build(&self, game: &str) -> Result<(), ServiceError> {
        let url = self.url(BUILD_PATH, game)?;
        debug!(%url, "POST");

        let response = self.client.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Build request rejected");
            return Err(ServiceError::new(format!("Build failed: {} - {}", status, body)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn next_move(&self, game: &str) -> Result<NextMove, ServiceError> {
        let next: NextMove = self.get_data(NEXT_MOVE_PATH, game).await?;
        debug!(x = next.x, y = next.y, "Got next move");
        Ok(next)
    }

    #[instrument(skip(self))]
    async fn chances(&self, game: &str) -> Result<Chances, ServiceError> {
        self.get_data(CHANCES_PATH, game).await
    }
}
