//! Upstream catalog integration (PokeAPI).
//!
//! The client here is pure I/O: it fetches the full listing, per-item detail
//! and species payloads and parses them into explicit raw structs. Turning
//! those into index entries and detail records is done by the catalog and
//! detail modules.

mod pokeapi;
mod sprites;
mod types;

pub use pokeapi::{PokeApiClient, INDEX_FETCH_LIMIT};
pub use sprites::*;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the upstream catalog.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream reported that the resource does not exist (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Upstream returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound(_))
    }
}

/// Source of raw catalog data.
///
/// Implemented by [`PokeApiClient`] and by the mock in `testing`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the whole listing in one call.
    async fn fetch_index(&self) -> Result<Vec<RawIndexEntry>, UpstreamError>;

    /// Fetch the full payload for one id. Fails with `NotFound` on 404.
    async fn fetch_detail(&self, id: u32) -> Result<RawDetail, UpstreamError>;

    /// Fetch the species payload for one id. `Ok(None)` when upstream has no
    /// species record for it.
    async fn fetch_description(&self, id: u32) -> Result<Option<RawSpecies>, UpstreamError>;
}
