//! Per-floor art selection: floor tiles and decoration pools.

use crate::types::RoomShape;

pub const STARTING_FLOOR: u8 = 1;

const FLOOR_TILES: [&str; 4] = ["tile055", "tile058", "tile049", "tile052"];
const DEFAULT_FLOOR_TILE: &str = "tile055";

const FLOOR_ONE_DECORATIONS: &[&str] = &[
    "tile185", "tile186", "tile195", "tile167", "tile168", "tile169", "tile170", "tile171",
    "tile172", "tile173", "tile174", "tile177", "tile178", "tile179",
];
const FLOOR_TWO_DECORATIONS: &[&str] =
    &["tile180", "tile181", "tile182", "tile183", "tile184", "tile175", "tile176"];
const FLOOR_THREE_DECORATIONS: &[&str] = &[
    "tile187", "tile188", "tile189", "tile198", "tile199", "tile200", "tile201", "tile203",
    "tile204", "tile205",
];
const FLOOR_FOUR_DECORATIONS: &[&str] =
    &["tile210", "tile211", "tile212", "tile213", "tile214", "tile215"];

pub fn floor_tile(floor: u8) -> &'static str {
    floor_slot(floor).and_then(|slot| FLOOR_TILES.get(slot)).copied().unwrap_or(DEFAULT_FLOOR_TILE)
}

/// Decoration tiles available on a floor; empty past the last themed floor.
pub fn decoration_pool(floor: u8) -> &'static [&'static str] {
    match floor {
        1 => FLOOR_ONE_DECORATIONS,
        2 => FLOOR_TWO_DECORATIONS,
        3 => FLOOR_THREE_DECORATIONS,
        4 => FLOOR_FOUR_DECORATIONS,
        _ => &[],
    }
}

/// Upper bound on scattered decorations. Dead ends are cluttered, open
/// crossroads stay sparse so the walkways between doors read clearly.
pub fn decoration_limit(shape: RoomShape) -> usize {
    match shape {
        RoomShape::DeadEnd | RoomShape::Default => 15,
        RoomShape::Vertical | RoomShape::Horizontal | RoomShape::LShape => 12,
        RoomShape::TShape => 9,
        RoomShape::CrossShape => 6,
    }
}

fn floor_slot(floor: u8) -> Option<usize> {
    floor.checked_sub(STARTING_FLOOR).map(usize::from)
}
