//! Detail enrichment for a single catalog item.
//!
//! Always fetched fresh from upstream; nothing here is cached.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics;
use crate::upstream::{CatalogSource, RawDetail, RawSpecies, RawStat, RawTypeSlot, UpstreamError};

/// Moves included in a detail record.
pub const MAX_MOVES: usize = 2;

/// Language tag of the description to show.
pub const DESCRIPTION_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Pokemon {0} not found")]
    NotFound(u32),

    #[error("Upstream failure: {0}")]
    Upstream(#[source] UpstreamError),
}

/// Base stats in the fixed short-key shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub satk: u32,
    pub sdef: u32,
    pub spd: u32,
}

impl Stats {
    /// Pick the six known stats out of an unordered list. Unknown names are
    /// ignored; missing ones stay 0.
    pub fn from_raw(raw: &[RawStat]) -> Self {
        let mut stats = Stats::default();
        for stat in raw {
            let slot = match stat.stat.name.as_str() {
                "hp" => &mut stats.hp,
                "attack" => &mut stats.atk,
                "defense" => &mut stats.def,
                "special-attack" => &mut stats.satk,
                "special-defense" => &mut stats.sdef,
                "speed" => &mut stats.spd,
                _ => continue,
            };
            *slot = stat.base_stat;
        }
        stats
    }
}

/// Full record for one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub number: u32,
    /// Official artwork, else the front sprite, else empty.
    #[serde(rename = "image")]
    pub image_url: String,
    /// In slot order.
    pub types: Vec<String>,
    /// Kilograms.
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    /// Metres.
    #[serde(rename = "height")]
    pub height_m: f64,
    pub abilities: Vec<String>,
    pub moves: Vec<String>,
    pub stats: Stats,
    pub description: String,
}

impl DetailRecord {
    /// Assemble a record from the raw payload and an already cleaned
    /// description.
    pub fn from_raw(raw: &RawDetail, description: String) -> Self {
        let image_url = raw
            .sprites
            .official_artwork()
            .or(raw.sprites.front_default.as_deref())
            .unwrap_or_default()
            .to_string();

        Self {
            id: raw.id,
            name: raw.name.clone(),
            number: raw.id,
            image_url,
            types: types_in_slot_order(&raw.types),
            weight_kg: f64::from(raw.weight) / 10.0,
            height_m: f64::from(raw.height) / 10.0,
            abilities: raw
                .abilities
                .iter()
                .map(|a| a.ability.name.clone())
                .collect(),
            moves: raw
                .moves
                .iter()
                .take(MAX_MOVES)
                .map(|m| m.move_ref.name.clone())
                .collect(),
            stats: Stats::from_raw(&raw.stats),
            description,
        }
    }
}

fn types_in_slot_order(types: &[RawTypeSlot]) -> Vec<String> {
    let mut slots: Vec<&RawTypeSlot> = types.iter().collect();
    slots.sort_by_key(|t| t.slot);
    slots.into_iter().map(|t| t.kind.name.clone()).collect()
}

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\x0C\r]").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse line breaks and whitespace runs to single spaces and trim.
pub fn clean_flavor_text(text: &str) -> String {
    let text = LINE_BREAKS.replace_all(text, " ");
    WHITESPACE_RUNS.replace_all(&text, " ").trim().to_string()
}

/// First description in [`DESCRIPTION_LANGUAGE`], cleaned. Empty when there
/// is none.
pub fn description_from_species(species: &RawSpecies) -> String {
    species
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == DESCRIPTION_LANGUAGE)
        .map(|entry| clean_flavor_text(&entry.flavor_text))
        .unwrap_or_default()
}

/// Fetches and assembles detail records.
pub struct DetailService {
    source: Arc<dyn CatalogSource>,
}

impl DetailService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Fetch one item. A failed detail fetch fails the call; a failed
    /// description fetch only empties the description.
    pub async fn get_detail(&self, id: u32) -> Result<DetailRecord, DetailError> {
        let raw = self.source.fetch_detail(id).await.map_err(|e| {
            if e.is_not_found() {
                DetailError::NotFound(id)
            } else {
                DetailError::Upstream(e)
            }
        })?;

        let description = self.description(id).await;

        debug!(id, name = %raw.name, "Assembled detail record");

        Ok(DetailRecord::from_raw(&raw, description))
    }

    async fn description(&self, id: u32) -> String {
        match self.source.fetch_description(id).await {
            Ok(Some(species)) => description_from_species(&species),
            Ok(None) => String::new(),
            Err(e) => {
                metrics::DESCRIPTION_FALLBACKS.inc();
                warn!(id, error = %e, "Description fetch failed, using empty description");
                String::new()
            }
        }
    }
}
