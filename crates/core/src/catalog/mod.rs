//! Catalog index - the full upstream listing held in memory.
//!
//! The cache keeps one immutable snapshot at a time and rebuilds it lazily
//! once it is older than the TTL.

mod cache;
mod types;

pub use cache::{CacheError, CatalogCache, DEFAULT_CATALOG_TTL_SECS};
pub use types::*;
