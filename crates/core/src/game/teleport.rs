//! Out-of-band jumps used by the debug console. Each one despawns the
//! current enemies first so the lock never survives a teleport.

use tracing::info;

use super::Game;
use crate::error::{GenerationError, TransitionError};
use crate::types::{RoomId, RoomType};

impl Game {
    pub fn teleport_to_floor(&mut self, floor: u8) -> Result<u8, GenerationError> {
        self.rooms.reset_to_floor(floor, &mut self.player)?;
        self.on_floor_changed(floor);
        info!(floor, "teleported to floor");
        Ok(floor)
    }

    pub fn teleport_to_room(&mut self, room_type: RoomType) -> Result<RoomId, TransitionError> {
        let room = self
            .rooms
            .graph()
            .first_of_type(room_type)
            .ok_or(TransitionError::NoSuchRoomType(room_type))?;
        self.clear_enemies();
        let room = self.rooms.load_room(room, None, &mut self.player)?;
        self.on_room_entered(room);
        info!(%room, %room_type, "teleported to room");
        Ok(room)
    }

    /// Builds a new layout for the current floor and starts in its spawn room.
    pub fn regenerate_floor(&mut self) -> Result<u8, GenerationError> {
        self.teleport_to_floor(self.rooms.floor())
    }

    /// Kills every enemy in the current room without splitting.
    pub fn kill_room_enemies(&mut self) -> usize {
        let Some(room) = self.rooms.current_room() else {
            return 0;
        };
        let killed = self.enemies.kill_room(room);
        if let Some(change) = self.enemies.refresh_latch(room) {
            self.apply_latch(change);
        }
        killed
    }

    pub fn set_unkillable(&mut self, unkillable: bool) {
        self.player.set_unkillable(unkillable);
    }

    fn clear_enemies(&mut self) {
        self.enemies.despawn_enemies();
        self.rooms.set_enemy_lock(false);
    }
}
