//! Scattered floor decorations, generated once per room and cached on it.

use serde::Serialize;

use super::progression::{decoration_limit, decoration_pool};
use crate::rng::GameRng;
use crate::types::{Point, Rect, RoomShape};

const EDGE_MARGIN: f32 = 15.0;
/// Footprint used when discarding overlapping decorations.
pub const DECORATION_SIZE: f32 = 32.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decoration {
    pub tile: &'static str,
    pub pos: Point,
}

impl Decoration {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, DECORATION_SIZE, DECORATION_SIZE)
    }
}

pub fn generate_decorations(
    rng: &mut GameRng,
    floor: u8,
    shape: RoomShape,
    room_width: f32,
    room_height: f32,
) -> Vec<Decoration> {
    let pool = decoration_pool(floor);
    let count = rng.index(decoration_limit(shape));
    if pool.is_empty() {
        return Vec::new();
    }
    let area = Rect::new(
        EDGE_MARGIN,
        EDGE_MARGIN,
        (room_width - 2.0 * EDGE_MARGIN).max(0.0),
        (room_height - 2.0 * EDGE_MARGIN).max(0.0),
    );
    (0..count)
        .filter_map(|_| {
            let tile = *rng.choose(pool)?;
            let pos = rng.point_in(area);
            Some(Decoration { tile, pos: Point::new(pos.x.floor(), pos.y.floor()) })
        })
        .collect()
}

/// Drops any decoration overlapping one that was kept before it.
pub fn non_overlapping(decorations: &[Decoration]) -> Vec<&Decoration> {
    let mut kept: Vec<&Decoration> = Vec::with_capacity(decorations.len());
    for decoration in decorations {
        let bounds = decoration.bounds();
        if kept.iter().all(|other| !other.bounds().overlaps(&bounds)) {
            kept.push(decoration);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorations_stay_inside_margins() {
        let mut rng = GameRng::seeded(5);
        for floor in 1..=4 {
            for _ in 0..50 {
                for decoration in generate_decorations(&mut rng, floor, RoomShape::DeadEnd, 750.0, 750.0) {
                    assert!(decoration.pos.x >= EDGE_MARGIN && decoration.pos.x < 750.0);
                    assert!(decoration.pos.y >= EDGE_MARGIN && decoration.pos.y < 750.0);
                    assert!(decoration_pool(floor).contains(&decoration.tile));
                }
            }
        }
    }

    #[test]
    fn floors_without_a_pool_get_nothing() {
        let mut rng = GameRng::seeded(5);
        for _ in 0..20 {
            assert!(generate_decorations(&mut rng, 7, RoomShape::DeadEnd, 750.0, 750.0).is_empty());
        }
    }

    #[test]
    fn room_shape_bounds_the_decoration_count() {
        let mut rng = GameRng::seeded(9);
        let mut dead_end_max = 0;
        for _ in 0..200 {
            let crossroads = generate_decorations(&mut rng, 1, RoomShape::CrossShape, 750.0, 750.0);
            assert!(crossroads.len() < decoration_limit(RoomShape::CrossShape));
            let dead_end = generate_decorations(&mut rng, 1, RoomShape::DeadEnd, 750.0, 750.0);
            dead_end_max = dead_end_max.max(dead_end.len());
        }
        assert!(dead_end_max >= decoration_limit(RoomShape::CrossShape));
    }

    #[test]
    fn overlapping_decorations_are_dropped_in_order() {
        let decorations = vec![
            Decoration { tile: "tile180", pos: Point::new(10.0, 10.0) },
            Decoration { tile: "tile181", pos: Point::new(20.0, 20.0) },
            Decoration { tile: "tile182", pos: Point::new(100.0, 10.0) },
        ];
        let kept = non_overlapping(&decorations);
        let tiles: Vec<_> = kept.iter().map(|decoration| decoration.tile).collect();
        assert_eq!(tiles, ["tile180", "tile182"]);
    }
}
