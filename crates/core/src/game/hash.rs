//! Stable snapshot hashing for determinism checks across runs with the same seed and inputs.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::Game;
use crate::enemy::BehaviorState;
use crate::player::PlayerHandle;

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        hasher.write_u8(self.rooms.floor());
        hasher.write_u64(self.rooms.graph().fingerprint());
        hasher.write_u32(self.rooms.current_room().map_or(u32::MAX, |room| room.0));

        let player = &self.player;
        hasher.write_u32(player.position().x.to_bits());
        hasher.write_u32(player.position().y.to_bits());
        hasher.write_i32(player.hp());
        hasher.write_u8(player.shells());
        hasher.write_usize(player.bullets().len());

        for enemy in self.enemies.enemies() {
            hasher.write_u32(enemy.room.0);
            hasher.write_u32(enemy.pos.x.to_bits());
            hasher.write_u32(enemy.pos.y.to_bits());
            hasher.write_i32(enemy.hp);
            hasher.write_u8(enemy.stage);
            hasher.write_u8(match enemy.state {
                BehaviorState::Chasing => 0,
                BehaviorState::Wandering { .. } => 1,
                BehaviorState::Dead => 2,
            });
        }
        hasher.finish()
    }
}
