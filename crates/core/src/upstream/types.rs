//! Raw upstream response shapes.
//!
//! Only the fields the service reads are modelled; everything else in the
//! payload is ignored. Field names follow the upstream JSON.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared
// ============================================================================

/// A `{name, url}` reference to another upstream resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// Listing
// ============================================================================

/// One row of the full listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawIndexEntry {
    pub name: String,
    /// Canonical resource URL, e.g. `https://pokeapi.co/api/v2/pokemon/25/`.
    pub url: String,
}

impl RawIndexEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Numeric id taken from the last non-empty path segment of the URL.
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

/// Extract the id from a canonical resource URL.
///
/// Returns `None` when the trailing segment is not a positive integer.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(|segment| segment.parse::<u32>().ok())
        .filter(|id| *id >= 1)
}

/// Listing response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIndexPage {
    #[serde(default)]
    pub count: u32,
    pub results: Vec<RawIndexEntry>,
}

// ============================================================================
// Detail
// ============================================================================

/// Per-item payload from `/pokemon/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: RawSprites,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    /// Tenths of a kilogram.
    #[serde(default)]
    pub weight: u32,
    /// Tenths of a metre.
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub abilities: Vec<RawAbilitySlot>,
    #[serde(default)]
    pub moves: Vec<RawMoveSlot>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<RawOtherSprites>,
}

impl RawSprites {
    /// Official artwork URL, if upstream has one.
    pub fn official_artwork(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<RawArtwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawArtwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawAbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMoveSlot {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

// ============================================================================
// Species
// ============================================================================

/// Species payload from `/pokemon-species/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSpecies {
    #[serde(default)]
    pub flavor_text_entries: Vec<RawFlavorText>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawFlavorText {
    pub flavor_text: String,
    pub language: NamedResource,
}
