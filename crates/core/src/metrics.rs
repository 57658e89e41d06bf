//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Upstream catalog requests
//! - Catalog cache lookups and refreshes
//! - Detail enrichment

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Upstream Metrics
// =============================================================================

/// Upstream request duration by operation.
pub static UPSTREAM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_upstream_request_duration_seconds",
            "Duration of upstream catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"], // "fetch_index", "fetch_detail", "fetch_description"
    )
    .unwrap()
});

/// Upstream requests total by operation and status.
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_upstream_requests_total",
            "Total upstream catalog requests",
        ),
        &["operation", "status"], // status: "success", "not_found", "error"
    )
    .unwrap()
});

// =============================================================================
// Catalog Cache Metrics
// =============================================================================

/// Cache lookups by outcome.
pub static CATALOG_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_catalog_lookups_total", "Total catalog cache lookups"),
        &["outcome"], // "hit", "refresh", "joined"
    )
    .unwrap()
});

/// Catalog refreshes by result.
pub static CATALOG_REFRESHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_catalog_refreshes_total", "Total catalog refreshes"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Catalog refresh duration in seconds.
pub static CATALOG_REFRESH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_catalog_refresh_duration_seconds",
            "Duration of catalog index rebuilds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

/// Entries in the current snapshot.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_catalog_entries",
        "Number of entries in the current catalog snapshot",
    )
    .unwrap()
});

// =============================================================================
// Detail Metrics
// =============================================================================

/// Description fetches that failed and fell back to an empty description.
pub static DESCRIPTION_FALLBACKS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pokedex_description_fallbacks_total",
        "Total description fetch failures replaced by an empty description",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Upstream
        Box::new(UPSTREAM_REQUEST_DURATION.clone()),
        Box::new(UPSTREAM_REQUESTS.clone()),
        // Catalog
        Box::new(CATALOG_LOOKUPS.clone()),
        Box::new(CATALOG_REFRESHES.clone()),
        Box::new(CATALOG_REFRESH_DURATION.clone()),
        Box::new(CATALOG_ENTRIES.clone()),
        // Detail
        Box::new(DESCRIPTION_FALLBACKS.clone()),
    ]
}
