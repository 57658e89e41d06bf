//! Mock upstream catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::upstream::{CatalogSource, RawDetail, RawIndexEntry, RawSpecies, UpstreamError};

/// A recorded upstream call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedUpstreamCall {
    FetchIndex,
    FetchDetail { id: u32 },
    FetchDescription { id: u32 },
}

/// Mock implementation of the CatalogSource trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable listing, detail and species payloads
/// - Track calls for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_core::testing::{MockCatalogSource, fixtures};
///
/// let source = MockCatalogSource::new();
/// source.set_index(fixtures::index(151)).await;
/// source.add_detail(fixtures::detail(25, "pikachu")).await;
///
/// let cache = CatalogCache::new(Arc::new(source));
/// ```
#[derive(Debug)]
pub struct MockCatalogSource {
    /// Listing returned by `fetch_index`.
    index: Arc<RwLock<Vec<RawIndexEntry>>>,
    /// Detail payloads by id. Missing ids are `NotFound`.
    details: Arc<RwLock<HashMap<u32, RawDetail>>>,
    /// Species payloads by id. Missing ids are `Ok(None)`.
    species: Arc<RwLock<HashMap<u32, RawSpecies>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedUpstreamCall>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<UpstreamError>>>,
    /// When true, every description fetch fails.
    fail_descriptions: Arc<RwLock<bool>>,
    /// Delay applied to every call before it returns.
    latency: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self {
            index: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            species: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_descriptions: Arc::new(RwLock::new(false)),
            latency: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Payload Configuration
    // =========================================================================

    /// Replace the listing.
    pub async fn set_index(&self, entries: Vec<RawIndexEntry>) {
        *self.index.write().await = entries;
    }

    /// Append one row to the listing.
    pub async fn add_index_entry(&self, entry: RawIndexEntry) {
        self.index.write().await.push(entry);
    }

    /// Add a detail payload, keyed by its id.
    pub async fn add_detail(&self, detail: RawDetail) {
        self.details.write().await.insert(detail.id, detail);
    }

    /// Add a species payload for `id`.
    pub async fn add_species(&self, id: u32, species: RawSpecies) {
        self.species.write().await.insert(id, species);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedUpstreamCall> {
        self.calls.read().await.clone()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Get the number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Get the number of listing fetches made.
    pub async fn index_fetch_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| **c == RecordedUpstreamCall::FetchIndex)
            .count()
    }

    // =========================================================================
    // Failure and Latency Injection
    // =========================================================================

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: UpstreamError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Make every description fetch fail (or stop failing).
    pub async fn set_fail_descriptions(&self, fail: bool) {
        *self.fail_descriptions.write().await = fail;
    }

    /// Delay every call by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Record a call, wait out the configured latency, then hand back any
    /// pending error.
    async fn begin(&self, call: RecordedUpstreamCall) -> Result<(), UpstreamError> {
        self.calls.write().await.push(call);

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_index(&self) -> Result<Vec<RawIndexEntry>, UpstreamError> {
        self.begin(RecordedUpstreamCall::FetchIndex).await?;
        Ok(self.index.read().await.clone())
    }

    async fn fetch_detail(&self, id: u32) -> Result<RawDetail, UpstreamError> {
        self.begin(RecordedUpstreamCall::FetchDetail { id }).await?;

        self.details
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(format!("Pokemon ID {}", id)))
    }

    async fn fetch_description(&self, id: u32) -> Result<Option<RawSpecies>, UpstreamError> {
        self.begin(RecordedUpstreamCall::FetchDescription { id })
            .await?;

        if *self.fail_descriptions.read().await {
            return Err(UpstreamError::ApiError {
                status: 500,
                message: "mock description failure".to_string(),
            });
        }

        Ok(self.species.read().await.get(&id).cloned())
    }
}
