//! One run of the crawler: wires the player, the room controller and the
//! enemy coordinator together and steps them in a fixed order each tick.

mod hash;
mod teleport;

use std::mem;

use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::controller::{RoomController, RoomEvent};
use crate::coordinator::{EnemyCoordinator, LatchChange};
use crate::error::GameError;
use crate::mapgen::STARTING_FLOOR;
use crate::player::{Player, PlayerHandle};
use crate::projectile::advance_all;
use crate::rng::{GameRng, STREAM_ENEMIES, STREAM_PLAYER};
use crate::timer::Countdown;
use crate::types::{GameEvent, PlayerInput, RoomId, RoomType};

pub struct Game {
    seed: u64,
    tick: u64,
    config: GameConfig,
    player: Player,
    rooms: RoomController,
    enemies: EnemyCoordinator,
    events: Vec<GameEvent>,
    respawn: Countdown,
}

impl Game {
    pub fn new(seed: u64, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rooms = RoomController::new(config.clone(), seed)?;
        let player = Player::new(
            config.room_bounds().center(),
            GameRng::for_stream(seed, STREAM_PLAYER),
        );
        let enemies =
            EnemyCoordinator::new(config.clone(), GameRng::for_stream(seed, STREAM_ENEMIES));
        let mut game = Self {
            seed,
            tick: 0,
            config,
            player,
            rooms,
            enemies,
            events: Vec::new(),
            respawn: Countdown::idle(),
        };
        let start = game.rooms.load_spawn_room(&mut game.player)?;
        game.on_room_entered(start);
        info!(seed, rooms = game.rooms.graph().len(), "run started");
        Ok(game)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn rooms(&self) -> &RoomController {
        &self.rooms
    }

    pub fn enemies(&self) -> &EnemyCoordinator {
        &self.enemies
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn.is_running()
    }

    /// Events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// One fixed step. Enemies update before doors are tested so a kill on
    /// this tick unlocks the doors on this tick.
    pub fn tick(&mut self, input: &PlayerInput) {
        self.tick += 1;
        let dt_ms = self.config.tick_ms;

        self.player.update(input, dt_ms, self.config.room_bounds());

        let Some(current) = self.rooms.current_room() else {
            warn!(tick = self.tick, "no room loaded, skipping enemies and doors");
            self.update_respawn(dt_ms);
            return;
        };
        self.update_projectiles(current);

        if let Some(change) = self.enemies.update(&mut self.player, current) {
            self.apply_latch(change);
        }
        for split in self.enemies.drain_splits() {
            self.events.push(GameEvent::EnemySplit { parent: split.parent, children: split.children });
        }

        let living = self.enemies.living_in(current);
        match self.rooms.update(dt_ms, &mut self.player, living) {
            Some(RoomEvent::Entered(room)) => self.on_room_entered(room),
            Some(RoomEvent::FloorAdvanced(floor)) => self.on_floor_changed(floor),
            None => {}
        }

        self.update_respawn(dt_ms);
    }

    fn update_projectiles(&mut self, room: RoomId) {
        let area = self.config.room_bounds();
        let bullets = self.player.bullets_mut();
        advance_all(bullets, area);

        let mut flying = Vec::with_capacity(bullets.len());
        for bullet in mem::take(bullets) {
            let bounds = bullet.bounds();
            let target = self
                .enemies
                .enemies_in(room)
                .find(|enemy| !enemy.is_dead() && enemy.bounds().overlaps(&bounds))
                .map(|enemy| enemy.id);
            match target {
                Some(id) => {
                    self.enemies.damage_enemy(id, bullet.damage);
                }
                None => flying.push(bullet),
            }
        }
        *self.player.bullets_mut() = flying;
    }

    fn apply_latch(&mut self, change: LatchChange) {
        match change {
            LatchChange::Locked => self.rooms.set_enemy_lock(true),
            LatchChange::Unlocked { cleared } => {
                self.rooms.set_enemy_lock(false);
                if let Some(room) = cleared {
                    self.events.push(GameEvent::RoomCleared { room });
                    let room_type = self.rooms.graph().room(room).map(|entry| entry.room_type);
                    let boss_room = room_type == Some(RoomType::BossRoom);
                    if boss_room && self.rooms.floor() >= self.config.max_floors {
                        info!(floor = self.rooms.floor(), "final boss defeated");
                        self.events.push(GameEvent::FinalBossDefeated);
                    }
                }
            }
        }
    }

    fn on_room_entered(&mut self, room: RoomId) {
        let Some(entry) = self.rooms.graph().room(room) else {
            error!(%room, "entered a room that is not on this floor");
            return;
        };
        let (room_type, shape) = (entry.room_type, entry.shape());
        self.events.push(GameEvent::RoomEntered { room, room_type, shape });

        let count = self.enemies.spawn_enemies_for_room(
            room,
            room_type,
            self.rooms.floor(),
            self.player.position(),
        );
        if count > 0 {
            debug!(%room, count, "enemies spawned");
            self.events.push(GameEvent::EnemiesSpawned { room, count });
        }
        if let Some(change) = self.enemies.refresh_latch(room) {
            self.apply_latch(change);
        }
    }

    /// Room ids restart on every new layout, so clearance from the old floor is meaningless.
    fn on_floor_changed(&mut self, floor: u8) {
        self.enemies.despawn_enemies();
        self.enemies.forget_cleared_rooms();
        self.rooms.set_enemy_lock(false);
        self.events.push(GameEvent::FloorAdvanced { floor });
        if let Some(room) = self.rooms.current_room() {
            self.on_room_entered(room);
        }
    }

    fn update_respawn(&mut self, dt_ms: u32) {
        if self.player.is_dead() && !self.respawn.is_running() {
            let switched = self.enemies.on_player_death();
            info!(tick = self.tick, switched, "player died");
            self.events.push(GameEvent::PlayerDied);
            if self.config.respawn_delay_ms == 0 {
                self.respawn_player();
            } else {
                self.respawn.restart(self.config.respawn_delay_ms);
            }
            return;
        }
        if self.respawn.advance(dt_ms) {
            self.respawn_player();
        }
    }

    fn respawn_player(&mut self) {
        self.player.reset(self.config.room_bounds().center());
        self.enemies.on_player_respawn();
        match self.rooms.reset_to_floor(STARTING_FLOOR, &mut self.player) {
            Ok(floor) => self.on_floor_changed(floor),
            Err(err) => {
                error!(%err, "could not rebuild the first floor, respawning on this one");
                self.enemies.despawn_enemies();
                self.rooms.set_enemy_lock(false);
                match self.rooms.load_spawn_room(&mut self.player) {
                    Ok(room) => self.on_room_entered(room),
                    Err(err) => error!(%err, "no room to respawn in"),
                }
            }
        }
        info!(floor = self.rooms.floor(), "player respawned");
        self.events.push(GameEvent::PlayerRespawned);
    }
}

#[cfg(test)]
mod tests;
