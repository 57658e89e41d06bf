//! PokeAPI HTTP client.
//!
//! The public instance needs no API key. Every call is a single GET with no
//! retry; any transport or status failure is returned to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{RawDetail, RawIndexEntry, RawIndexPage, RawSpecies};
use super::{CatalogSource, UpstreamError};
use crate::config::UpstreamConfig;
use crate::metrics;

/// `limit` passed to the listing endpoint so the whole catalog comes back in
/// one page.
pub const INDEX_FETCH_LIMIT: u32 = 100_000;

/// PokeAPI client.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET and record request metrics for `operation`.
    async fn get(
        &self,
        operation: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Response, UpstreamError> {
        let start = Instant::now();
        let result = self.client.get(url).query(query).send().await;

        metrics::UPSTREAM_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        let status_label = match &result {
            Ok(response) if response.status().is_success() => "success",
            Ok(response) if response.status() == 404 => "not_found",
            _ => "error",
        };
        metrics::UPSTREAM_REQUESTS
            .with_label_values(&[operation, status_label])
            .inc();

        Ok(result?)
    }

    /// Map non-success statuses to errors and parse the body.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, UpstreamError> {
        let status = response.status();
        if status == 404 {
            return Err(UpstreamError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            UpstreamError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_index(&self) -> Result<Vec<RawIndexEntry>, UpstreamError> {
        let url = format!("{}/pokemon", self.base_url);

        debug!("PokeAPI fetch index: limit={}", INDEX_FETCH_LIMIT);

        let response = self
            .get(
                "fetch_index",
                &url,
                &[("limit", INDEX_FETCH_LIMIT.to_string())],
            )
            .await?;

        let page: RawIndexPage = Self::read_json(response, "pokemon listing").await?;

        debug!(
            "PokeAPI index: {} entries (reported count {})",
            page.results.len(),
            page.count
        );

        Ok(page.results)
    }

    async fn fetch_detail(&self, id: u32) -> Result<RawDetail, UpstreamError> {
        let url = format!("{}/pokemon/{}", self.base_url, id);

        debug!("PokeAPI fetch detail: id={}", id);

        let response = self.get("fetch_detail", &url, &[]).await?;
        Self::read_json(response, &format!("Pokemon ID {}", id)).await
    }

    async fn fetch_description(&self, id: u32) -> Result<Option<RawSpecies>, UpstreamError> {
        let url = format!("{}/pokemon-species/{}", self.base_url, id);

        debug!("PokeAPI fetch species: id={}", id);

        let response = self.get("fetch_description", &url, &[]).await?;
        match Self::read_json(response, &format!("Species ID {}", id)).await {
            Ok(species) => Ok(Some(species)),
            Err(UpstreamError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
