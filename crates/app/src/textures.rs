//! Placeholder art: every texture key resolves to a stable flat colour.

use crawler_core::TextureSource;
use macroquad::color::Color;
use xxhash_rust::xxh3::xxh3_64;

pub struct FlatColors;

impl TextureSource for FlatColors {
    type Handle = Color;

    fn texture(&self, key: &str) -> Option<Color> {
        if key.is_empty() {
            return None;
        }
        let [r, g, b, ..] = xxh3_64(key.as_bytes()).to_le_bytes();
        // Keep floors and props dark enough for sprites to read on top.
        Some(Color::from_rgba(40 + r / 4, 40 + g / 4, 40 + b / 4, 255))
    }
}
