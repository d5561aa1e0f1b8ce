//! Procedural floor layout: the room graph, its generator, and per-floor art.

pub mod decorations;
pub mod graph;
pub mod progression;

mod generator;

pub use decorations::{Decoration, generate_decorations, non_overlapping};
pub use generator::{DungeonGenerator, GeneratedFloor};
pub use graph::{ConnectionRepair, Room, RoomGraph, room_shape};
pub use progression::{STARTING_FLOOR, floor_tile};

use crate::error::GenerationError;
use crate::rng::{GameRng, STREAM_LAYOUT, derive_stream_seed};

/// Generates the layout for one floor of a run, independent of any other floor.
pub fn generate_floor(
    run_seed: u64,
    floor: u8,
    target_room_count: usize,
    retries: u32,
) -> Result<GeneratedFloor, GenerationError> {
    let seed = derive_stream_seed(run_seed ^ u64::from(floor), STREAM_LAYOUT);
    DungeonGenerator::new(GameRng::seeded(seed), retries).generate(target_room_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomId;

    #[test]
    fn generate_floor_matches_generator_output() {
        let seed = derive_stream_seed(123 ^ 2, STREAM_LAYOUT);
        let from_helper = generate_floor(123, 2, 6, 4).expect("helper floor");
        let from_generator =
            DungeonGenerator::new(GameRng::seeded(seed), 4).generate(6).expect("floor");
        assert_eq!(from_helper, from_generator);
    }

    #[test]
    fn nine_room_floor_is_fully_reachable_from_origin() {
        for seed in 0..50 {
            let floor = generate_floor(seed, 1, 6, 8).expect("floor");
            assert!(floor.graph.len() >= 9, "seed {seed} built {} rooms", floor.graph.len());
            assert_eq!(floor.graph.reachable_from(RoomId(0)).len(), floor.graph.len());
        }
    }
}
