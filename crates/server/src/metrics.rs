//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Pokedex server:
//! - HTTP request metrics (latency, counts, errors)
//! - Authentication and login outcomes
//! - Catalog cache state (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Auth Metrics
// =============================================================================

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_auth_failures_total",
            "Total authentication failures",
        ),
        &["reason"], // "not_authenticated", "invalid_token"
    )
    .unwrap()
});

/// Login attempts by result.
pub static LOGINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_logins_total", "Total login attempts"),
        &["result"], // "success", "invalid_credentials", "error"
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Age of the current catalog snapshot.
pub static CATALOG_SNAPSHOT_AGE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_catalog_snapshot_age_seconds",
        "Seconds since the current catalog snapshot was fetched (-1 when empty)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Auth
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();
    registry.register(Box::new(LOGINS_TOTAL.clone())).unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_SNAPSHOT_AGE.clone()))
        .unwrap();

    // Core metrics (upstream, catalog cache, detail)
    for metric in pokedex_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Reads the cache status only; never triggers a refresh. Ages are measured
/// on the cache's own clock.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let status = state.catalog().status().await;

    pokedex_core::metrics::CATALOG_ENTRIES.set(status.entries as i64);

    let now = state.catalog().clock().now();
    let age = status
        .fetched_at
        .map(|fetched_at| (now - fetched_at).num_seconds())
        .unwrap_or(-1);
    CATALOG_SNAPSHOT_AGE.set(age);
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/pokemons/25"), "/pokemons/{id}");
        assert_eq!(normalize_path("/pokemons/10094/"), "/pokemons/{id}/");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/pokemons"), "/pokemons");
        assert_eq!(normalize_path("/login"), "/login");
        assert_eq!(normalize_path("/pokemons/pikachu"), "/pokemons/pikachu");
    }

    #[tokio::test]
    async fn test_snapshot_age_follows_cache_clock() {
        use pokedex_core::testing::{fixtures, ManualClock, MockCatalogSource};
        use pokedex_core::{CatalogCache, CatalogSource, Clock, Config, TokenService};
        use std::sync::Arc;

        let source = Arc::new(MockCatalogSource::new());
        source.set_index(fixtures::index(4)).await;
        let clock = Arc::new(ManualClock::default());
        let catalog = CatalogCache::with_clock(
            Arc::clone(&source) as Arc<dyn CatalogSource>,
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        let state = crate::state::AppState::with_catalog(
            &Config::default(),
            Arc::new(TokenService::new(b"metrics-test")),
            source,
            catalog,
        );

        state.catalog().get_current().await.unwrap();
        clock.advance(chrono::Duration::minutes(90));
        collect_dynamic_metrics(&state).await;

        assert_eq!(CATALOG_SNAPSHOT_AGE.get(), 90 * 60);
        assert_eq!(pokedex_core::metrics::CATALOG_ENTRIES.get(), 4);
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("pokedex_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        // Prometheus only outputs vectors that have at least one label set
        pokedex_core::metrics::CATALOG_LOOKUPS
            .with_label_values(&["hit"])
            .inc_by(0);
        pokedex_core::metrics::UPSTREAM_REQUESTS
            .with_label_values(&["fetch_index", "success"])
            .inc_by(0);
        AUTH_FAILURES_TOTAL
            .with_label_values(&["invalid_token"])
            .inc_by(0);
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();

        assert!(output.contains("pokedex_http_requests_in_flight"));
        assert!(output.contains("pokedex_auth_failures_total"));
        assert!(output.contains("pokedex_catalog_lookups_total"));
        assert!(output.contains("pokedex_upstream_requests_total"));
        assert!(output.contains("pokedex_catalog_entries"));
        assert!(output.contains("pokedex_catalog_snapshot_age_seconds"));
    }
}
