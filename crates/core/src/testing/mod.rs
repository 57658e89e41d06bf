//! Testing utilities and mock implementations.
//!
//! This module provides a mock upstream catalog and a manual clock, allowing
//! cache expiry, token expiry and end-to-end tests without network access or
//! sleeping.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{fixtures, ManualClock, MockCatalogSource};
//!
//! let source = Arc::new(MockCatalogSource::new());
//! let clock = Arc::new(ManualClock::default());
//! source.set_index(fixtures::index(3)).await;
//!
//! let cache = CatalogCache::with_clock(source.clone(), clock.clone());
//! cache.get_current().await?;
//! clock.advance(chrono::Duration::hours(1));
//! ```

mod clock;
mod mock_catalog_source;

pub use clock::ManualClock;
pub use mock_catalog_source::{MockCatalogSource, RecordedUpstreamCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::upstream::{
        NamedResource, RawAbilitySlot, RawArtwork, RawDetail, RawFlavorText, RawIndexEntry,
        RawMoveSlot, RawOtherSprites, RawSpecies, RawSprites, RawStat, RawTypeSlot,
    };

    const API_BASE: &str = "https://pokeapi.co/api/v2";

    /// Canonical resource URL for `id`, with the trailing slash upstream uses.
    pub fn resource_url(id: u32) -> String {
        format!("{}/pokemon/{}/", API_BASE, id)
    }

    /// A listing row for `id`.
    pub fn index_entry(id: u32, name: &str) -> RawIndexEntry {
        RawIndexEntry::new(name, resource_url(id))
    }

    /// A listing of ids `1..=count` named `pokemon-<id>`.
    pub fn index(count: u32) -> Vec<RawIndexEntry> {
        (1..=count)
            .map(|id| index_entry(id, &format!("pokemon-{}", id)))
            .collect()
    }

    pub fn front_sprite_url(id: u32) -> String {
        format!("https://sprites.example/pokemon/{}.png", id)
    }

    pub fn artwork_url(id: u32) -> String {
        format!("https://sprites.example/pokemon/other/official-artwork/{}.png", id)
    }

    /// Sprite block with the given front sprite and official artwork.
    pub fn sprites(front_default: Option<String>, artwork: Option<String>) -> RawSprites {
        RawSprites {
            front_default,
            other: Some(RawOtherSprites {
                official_artwork: Some(RawArtwork {
                    front_default: artwork,
                }),
            }),
        }
    }

    pub fn type_slot(slot: u32, name: &str) -> RawTypeSlot {
        RawTypeSlot {
            slot,
            kind: NamedResource::new(name, ""),
        }
    }

    /// A detail payload with both sprites, one type, one ability, three moves
    /// and all six stats.
    pub fn detail(id: u32, name: &str) -> RawDetail {
        RawDetail {
            id,
            name: name.to_string(),
            sprites: sprites(Some(front_sprite_url(id)), Some(artwork_url(id))),
            types: vec![type_slot(1, "normal")],
            weight: 100,
            height: 10,
            abilities: vec![RawAbilitySlot {
                ability: NamedResource::new("run-away", ""),
            }],
            moves: (1..=3)
                .map(|i| RawMoveSlot {
                    move_ref: NamedResource::new(format!("move-{}", i), ""),
                })
                .collect(),
            stats: [
                ("hp", 50),
                ("attack", 55),
                ("defense", 40),
                ("special-attack", 50),
                ("special-defense", 50),
                ("speed", 90),
            ]
            .into_iter()
            .map(|(stat, base_stat)| RawStat {
                base_stat,
                stat: NamedResource::new(stat, ""),
            })
            .collect(),
        }
    }

    /// A species payload with `(language, text)` flavor entries in order.
    pub fn species(entries: &[(&str, &str)]) -> RawSpecies {
        RawSpecies {
            flavor_text_entries: entries
                .iter()
                .map(|(language, text)| RawFlavorText {
                    flavor_text: text.to_string(),
                    language: NamedResource::new(*language, ""),
                })
                .collect(),
        }
    }
}
