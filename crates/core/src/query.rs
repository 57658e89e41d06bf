//! Search, sort and pagination over a catalog snapshot.
//!
//! [`run_query`] is pure: the same snapshot and query always give the same
//! result. Callers must reject negative offsets and non-positive limits
//! before building a [`Query`].

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogSnapshot, IndexEntry};

/// Offset used when the request does not give one.
pub const DEFAULT_OFFSET: usize = 0;
/// Page size used when the request does not give one.
pub const DEFAULT_LIMIT: usize = 50;

/// Field the result is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Number,
    Name,
}

impl SortKey {
    /// `"name"` sorts by name; anything else, including no value, by number.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("name") => SortKey::Name,
            _ => SortKey::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub offset: usize,
    pub limit: usize,
    pub search: Option<String>,
    pub sort: SortKey,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            search: None,
            sort: SortKey::default(),
        }
    }
}

impl Query {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// One page of matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    #[serde(rename = "pokemons")]
    pub page: Vec<IndexEntry>,
    /// Matches before pagination.
    #[serde(rename = "count")]
    pub total_matched: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Filter, sort and paginate `snapshot`.
pub fn run_query(snapshot: &CatalogSnapshot, query: &Query) -> QueryResult {
    let mut matched: Vec<&IndexEntry> = match query.search.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let term = raw.trim().to_lowercase();
            snapshot
                .entries()
                .iter()
                .filter(|entry| matches_search(entry, &term, raw))
                .collect()
        }
        _ => snapshot.entries().iter().collect(),
    };

    // Both sorts are stable.
    match query.sort {
        SortKey::Name => matched.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Number => matched.sort_by_key(|entry| entry.number),
    }

    let total_matched = matched.len();
    let page = matched
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect();

    QueryResult {
        page,
        total_matched,
        offset: query.offset,
        limit: query.limit,
        has_more: query.offset.saturating_add(query.limit) < total_matched,
    }
}

/// Name match is case-insensitive; number match is a substring of the
/// decimal id against the term as given.
fn matches_search(entry: &IndexEntry, normalized: &str, raw: &str) -> bool {
    entry.name.to_lowercase().contains(normalized) || entry.number.to_string().contains(raw)
}
