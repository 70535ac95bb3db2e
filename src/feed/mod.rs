//! Upstream feed client.
//!
//! The upstream serves two JSON documents, each wrapping one raw text blob:
//!
//!   GET {base_url}/api/state     → { "odds": "<event feed>" }
//!   GET {base_url}/api/mappings  → { "mappings": "<id:name table>" }
//!
//! Transport failures surface here and nowhere else; the crawler skips the
//! cycle when either fetch fails.

use crate::config::FeedConfig;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Anything that can hand over the two raw blobs of a feed snapshot.
pub trait FeedSource: Send + Sync {
    fn fetch_events(&self) -> impl Future<Output = Result<String>> + Send;

    fn fetch_mappings(&self) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    odds: String,
}

#[derive(Debug, Deserialize)]
struct MappingsResponse {
    mappings: String,
}

/// HTTP implementation of [`FeedSource`].
pub struct FeedClient {
    base_url: String,
    state_path: String,
    mappings_path: String,
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            state_path: config.state_path.clone(),
            mappings_path: config.mappings_path.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(url = %url, "fetching feed document");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::ApiError(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::DeserializeFailed(format!("{}: {}", url, e)))
    }
}

impl FeedSource for FeedClient {
    async fn fetch_events(&self) -> Result<String> {
        let body: StateResponse = self.get_json(&self.state_path).await?;
        Ok(body.odds)
    }

    async fn fetch_mappings(&self) -> Result<String> {
        let body: MappingsResponse = self.get_json(&self.mappings_path).await?;
        Ok(body.mappings)
    }
}
