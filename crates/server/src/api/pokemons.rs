//! Catalog listing and detail handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pokedex_core::{
    query::{DEFAULT_LIMIT, DEFAULT_OFFSET},
    run_query, DetailError, DetailRecord, QueryResult, SortKey,
};
use std::sync::Arc;
use tracing::{debug, error};

use super::middleware::AuthUser;
use super::{error_response, ErrorResponse};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing. Numbers arrive as strings so that a bad
/// value gets a JSON error body.
#[derive(Debug, Default)]
pub struct ListPokemonsParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListPokemonsParams {
    /// Collect known keys from decoded query pairs. The first occurrence of
    /// a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "offset" => &mut params.offset,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "sort" => &mut params.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Validate and convert into a catalog query. Rejects negative offsets
    /// and non-positive limits.
    pub fn into_query(self) -> Result<pokedex_core::Query, String> {
        let offset = parse_integer("offset", self.offset.as_deref(), DEFAULT_OFFSET as i64)?;
        let limit = parse_integer("limit", self.limit.as_deref(), DEFAULT_LIMIT as i64)?;

        if offset < 0 {
            return Err("offset must be zero or greater".to_string());
        }
        if limit < 1 {
            return Err("limit must be greater than zero".to_string());
        }

        let mut query = pokedex_core::Query::new(offset as usize, limit as usize)
            .with_sort(SortKey::from_param(self.sort.as_deref()));
        if let Some(search) = self.search {
            query = query.with_search(search);
        }
        Ok(query)
    }
}

fn parse_integer(name: &str, value: Option<&str>, default: i64) -> Result<i64, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| format!("{} must be an integer", name)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List the catalog with search, sort and pagination.
pub async fn list_pokemons(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<QueryResult>, ApiError> {
    let query = ListPokemonsParams::from_pairs(pairs)
        .into_query()
        .map_err(|message| error_response(StatusCode::BAD_REQUEST, message))?;

    let snapshot = state.catalog().get_current().await.map_err(|e| {
        error!("Failed to load catalog: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch pokemons")
    })?;

    let result = run_query(&snapshot, &query);

    debug!(
        user = %user,
        offset = query.offset,
        limit = query.limit,
        search = ?query.search,
        matched = result.total_matched,
        "Listed catalog"
    );

    Ok(Json(result))
}

/// Full detail for one id, fetched fresh from upstream.
pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DetailRecord>, ApiError> {
    let not_found = || error_response(StatusCode::NOT_FOUND, "Pokemon not found");

    let id = match id.parse::<u32>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(not_found()),
    };

    match state.details().get_detail(id).await {
        Ok(record) => Ok(Json(record)),
        Err(DetailError::NotFound(_)) => Err(not_found()),
        Err(e) => {
            error!("Failed to fetch pokemon {}: {}", id, e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch pokemon",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(offset: Option<&str>, limit: Option<&str>) -> ListPokemonsParams {
        ListPokemonsParams {
            offset: offset.map(String::from),
            limit: limit.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let query = ListPokemonsParams::default().into_query().unwrap();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 50);
        assert_eq!(query.sort, SortKey::Number);
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_explicit_values() {
        let query = ListPokemonsParams {
            offset: Some("20".to_string()),
            limit: Some("10".to_string()),
            search: Some("pika".to_string()),
            sort: Some("name".to_string()),
        }
        .into_query()
        .unwrap();

        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search.as_deref(), Some("pika"));
        assert_eq!(query.sort, SortKey::Name);
    }

    #[test]
    fn test_negative_offset_rejected() {
        assert!(params(Some("-1"), None).into_query().is_err());
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        assert!(params(None, Some("0")).into_query().is_err());
        assert!(params(None, Some("-5")).into_query().is_err());
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = params(Some("abc"), None).into_query().unwrap_err();
        assert!(err.contains("offset"));
    }

    #[test]
    fn test_from_pairs_first_value_wins() {
        let pairs = vec![
            ("offset".to_string(), "1".to_string()),
            ("offset".to_string(), "2".to_string()),
            ("sort".to_string(), "name".to_string()),
            ("page".to_string(), "9".to_string()),
        ];
        let query = ListPokemonsParams::from_pairs(pairs).into_query().unwrap();

        assert_eq!(query.offset, 1);
        assert_eq!(query.limit, 50);
        assert_eq!(query.sort, SortKey::Name);
    }

    #[test]
    fn test_empty_value_uses_default() {
        let query = params(Some(""), Some(" ")).into_query().unwrap();
        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, 50);
    }
}
