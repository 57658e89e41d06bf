//! Process-wide catalog cache with lazy, single-flight refresh.

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::types::{CacheStatus, CatalogSnapshot};
use crate::clock::{Clock, SystemClock};
use crate::metrics;
use crate::upstream::{CatalogSource, UpstreamError};

/// Snapshot lifetime in seconds.
pub const DEFAULT_CATALOG_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Rebuilding the index failed. Every caller waiting on the same refresh
    /// receives the same error.
    #[error("Catalog refresh failed: {0}")]
    RefreshFailed(#[source] Arc<UpstreamError>),
}

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<CatalogSnapshot>, CacheError>>>;

enum CacheSlot {
    Empty,
    Populated(Arc<CatalogSnapshot>),
}

struct CacheState {
    slot: CacheSlot,
    in_flight: Option<RefreshFuture>,
}

/// Holds the current [`CatalogSnapshot`] and rebuilds it once it expires.
///
/// Fresh reads never touch the network. When the slot is empty or stale the
/// first reader starts a refresh and every concurrent reader awaits that same
/// refresh. A failed refresh leaves the previous snapshot in place.
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Arc<RwLock<CacheState>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn CatalogSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl: Duration::seconds(DEFAULT_CATALOG_TTL_SECS),
            state: Arc::new(RwLock::new(CacheState {
                slot: CacheSlot::Empty,
                in_flight: None,
            })),
        }
    }

    /// Override the snapshot lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Clock used for freshness checks and snapshot timestamps.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Return the current snapshot, refreshing it first if it is missing or
    /// expired.
    pub async fn get_current(&self) -> Result<Arc<CatalogSnapshot>, CacheError> {
        {
            let state = self.state.read().await;
            if let Some(snapshot) = self.fresh_snapshot(&state) {
                return Ok(snapshot);
            }
        }

        let refresh = {
            let mut state = self.state.write().await;
            // A refresh may have landed while waiting for the write lock.
            if let Some(snapshot) = self.fresh_snapshot(&state) {
                return Ok(snapshot);
            }
            self.join_or_start_refresh(&mut state)
        };

        refresh.await
    }

    /// Rebuild the snapshot regardless of freshness. Joins a refresh that is
    /// already running instead of starting another.
    pub async fn force_refresh(&self) -> Result<Arc<CatalogSnapshot>, CacheError> {
        let refresh = {
            let mut state = self.state.write().await;
            self.join_or_start_refresh(&mut state)
        };

        refresh.await
    }

    pub async fn status(&self) -> CacheStatus {
        let state = self.state.read().await;
        status_of(&state)
    }

    fn fresh_snapshot(&self, state: &CacheState) -> Option<Arc<CatalogSnapshot>> {
        match &state.slot {
            CacheSlot::Populated(snapshot) if snapshot.is_fresh(self.clock.now()) => {
                metrics::CATALOG_LOOKUPS.with_label_values(&["hit"]).inc();
                Some(Arc::clone(snapshot))
            }
            _ => None,
        }
    }

    fn join_or_start_refresh(&self, state: &mut CacheState) -> RefreshFuture {
        if let Some(in_flight) = &state.in_flight {
            metrics::CATALOG_LOOKUPS.with_label_values(&["joined"]).inc();
            debug!("Joining in-flight catalog refresh");
            return in_flight.clone();
        }

        metrics::CATALOG_LOOKUPS
            .with_label_values(&["refresh"])
            .inc();

        let refresh = run_refresh(
            Arc::clone(&self.source),
            Arc::clone(&self.clock),
            self.ttl,
            Arc::clone(&self.state),
        )
        .boxed()
        .shared();

        state.in_flight = Some(refresh.clone());
        refresh
    }
}

/// Fetch the listing, build a snapshot and publish it.
///
/// The state lock is only taken after the fetch completes, so readers of a
/// fresh snapshot are never blocked by upstream I/O.
async fn run_refresh(
    source: Arc<dyn CatalogSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Arc<RwLock<CacheState>>,
) -> Result<Arc<CatalogSnapshot>, CacheError> {
    info!("Refreshing catalog index");
    let start = Instant::now();

    let result = source.fetch_index().await;

    let mut state = state.write().await;
    state.in_flight = None;

    match result {
        Ok(raw) => {
            let snapshot = Arc::new(CatalogSnapshot::from_raw(&raw, clock.now(), ttl));
            state.slot = CacheSlot::Populated(Arc::clone(&snapshot));

            metrics::CATALOG_REFRESHES
                .with_label_values(&["success"])
                .inc();
            metrics::CATALOG_REFRESH_DURATION
                .with_label_values(&["success"])
                .observe(start.elapsed().as_secs_f64());
            metrics::CATALOG_ENTRIES.set(snapshot.len() as i64);

            let status = status_of(&state);
            info!(
                entries = status.entries,
                expires_at = ?status.expires_at,
                "Catalog index refreshed"
            );

            Ok(snapshot)
        }
        Err(e) => {
            metrics::CATALOG_REFRESHES
                .with_label_values(&["failed"])
                .inc();
            metrics::CATALOG_REFRESH_DURATION
                .with_label_values(&["failed"])
                .observe(start.elapsed().as_secs_f64());

            error!(
                error = %e,
                kept_stale = matches!(state.slot, CacheSlot::Populated(_)),
                "Catalog refresh failed"
            );

            Err(CacheError::RefreshFailed(Arc::new(e)))
        }
    }
}

fn status_of(state: &CacheState) -> CacheStatus {
    let refreshing = state.in_flight.is_some();
    match &state.slot {
        CacheSlot::Empty => CacheStatus {
            populated: false,
            entries: 0,
            fetched_at: None,
            expires_at: None,
            refreshing,
        },
        CacheSlot::Populated(snapshot) => CacheStatus {
            populated: true,
            entries: snapshot.len(),
            fetched_at: Some(snapshot.fetched_at()),
            expires_at: Some(snapshot.expires_at()),
            refreshing,
        },
    }
}
