//! Types for the catalog index.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::upstream::{image_url, RawIndexEntry};

/// One entry of the catalog index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub id: u32,
    pub name: String,
    /// Always equal to `id`.
    pub number: u32,
    #[serde(rename = "image")]
    pub image_url: String,
}

impl IndexEntry {
    /// Build an entry, deriving the number and image from the id.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            number: id,
            image_url: image_url(id),
        }
    }

    /// Build an entry from a raw listing row. The id comes from the URL only.
    pub fn from_raw(raw: &RawIndexEntry) -> Option<Self> {
        raw.id().map(|id| Self::new(id, raw.name.clone()))
    }
}

/// An immutable, fully built copy of the index.
///
/// Entries keep upstream listing order.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    entries: Vec<IndexEntry>,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(entries: Vec<IndexEntry>, fetched_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            entries,
            fetched_at,
            expires_at: fetched_at + ttl,
        }
    }

    /// Build a snapshot from a raw listing. Rows whose URL carries no usable
    /// id are skipped.
    pub fn from_raw(raw: &[RawIndexEntry], fetched_at: DateTime<Utc>, ttl: Duration) -> Self {
        let entries = raw
            .iter()
            .filter_map(|row| {
                let entry = IndexEntry::from_raw(row);
                if entry.is_none() {
                    warn!(name = %row.name, url = %row.url, "Skipping listing row without numeric id");
                }
                entry
            })
            .collect();

        Self::new(entries, fetched_at, ttl)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the snapshot may still be served at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Point-in-time view of the cache.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheStatus {
    pub populated: bool,
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub refreshing: bool,
}
