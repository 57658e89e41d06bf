//! Image URL policy.
//!
//! Images are served from the static sprites repository, never from the
//! catalog API. Regular forms use the front sprite; alternate forms (ids from
//! 10000 up) only have official artwork.

/// Base URL of the static sprite host.
pub const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// First id of the alternate-form range.
pub const ALTERNATE_FORM_MIN_ID: u32 = 10_000;

/// Image URL for an index entry.
pub fn image_url(id: u32) -> String {
    if id < ALTERNATE_FORM_MIN_ID {
        format!("{}/{}.png", SPRITE_BASE_URL, id)
    } else {
        format!("{}/other/official-artwork/{}.png", SPRITE_BASE_URL, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_form_uses_front_sprite() {
        assert_eq!(
            image_url(25),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
        );
        assert!(!image_url(9999).contains("official-artwork"));
    }

    #[test]
    fn test_alternate_form_uses_official_artwork() {
        assert_eq!(
            image_url(10094),
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/10094.png"
        );
        assert!(image_url(10000).contains("official-artwork"));
    }
}
