//! Room transitions: owns the floor's room graph, the current room, its door
//! regions, and the cooldown that keeps a freshly placed player from bouncing
//! straight back through a door.

use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::error::{GenerationError, TransitionError};
use crate::mapgen::{
    Decoration, DungeonGenerator, GeneratedFloor, RoomGraph, STARTING_FLOOR, floor_tile,
    generate_decorations, room_shape,
};
use crate::player::PlayerHandle;
use crate::rng::{GameRng, STREAM_DECORATION, STREAM_LAYOUT};
use crate::timer::Countdown;
use crate::types::{Direction, DoorTint, Point, Rect, RoomId, RoomShape, RoomType};

/// Resolves texture keys to whatever handle the renderer draws with.
pub trait TextureSource {
    type Handle;

    fn texture(&self, key: &str) -> Option<Self::Handle>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub direction: Direction,
    pub destination: RoomId,
    pub region: Rect,
    pub tint: DoorTint,
}

/// Doors stay shut while either the timer runs or the enemy lock is held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DoorCooldown {
    pub timer: Countdown,
    pub enemy_lock: bool,
}

impl DoorCooldown {
    pub fn is_active(&self) -> bool {
        self.timer.is_running() || self.enemy_lock
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomEvent {
    Entered(RoomId),
    FloorAdvanced(u8),
}

pub struct RoomController {
    graph: RoomGraph,
    floor: u8,
    current_room: Option<RoomId>,
    doors: Vec<Door>,
    cooldown: DoorCooldown,
    layout_rng: GameRng,
    decoration_rng: GameRng,
    config: GameConfig,
}

impl RoomController {
    /// Builds floor one; the player is not placed until a room is loaded.
    pub fn new(config: GameConfig, run_seed: u64) -> Result<Self, GenerationError> {
        let mut controller = Self {
            graph: RoomGraph::new(),
            floor: STARTING_FLOOR,
            current_room: None,
            doors: Vec::new(),
            cooldown: DoorCooldown::default(),
            layout_rng: GameRng::for_stream(run_seed, STREAM_LAYOUT),
            decoration_rng: GameRng::for_stream(run_seed, STREAM_DECORATION),
            config,
        };
        controller.regenerate()?;
        Ok(controller)
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn max_floors(&self) -> u8 {
        self.config.max_floors
    }

    pub fn current_room(&self) -> Option<RoomId> {
        self.current_room
    }

    pub fn current_room_type(&self) -> Option<RoomType> {
        self.current_room.and_then(|id| self.graph.room(id)).map(|room| room.room_type)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn cooldown(&self) -> DoorCooldown {
        self.cooldown
    }

    pub fn decorations(&self) -> &[Decoration] {
        self.current_room
            .and_then(|id| self.graph.room(id))
            .and_then(|room| room.decorations.as_deref())
            .unwrap_or(&[])
    }

    pub fn room_shape(&self, room: RoomId) -> Option<RoomShape> {
        self.graph.room(room).map(room_shape)
    }

    pub fn background_texture_key(&self) -> &'static str {
        floor_tile(self.floor)
    }

    pub fn background_texture<T: TextureSource>(&self, textures: &T) -> Option<T::Handle> {
        textures.texture(self.background_texture_key())
    }

    pub fn set_enemy_lock(&mut self, locked: bool) {
        self.cooldown.enemy_lock = locked;
    }

    /// Replaces the graph with a fresh layout for the current floor. On
    /// failure the previous graph is kept.
    fn regenerate(&mut self) -> Result<(), GenerationError> {
        let seed = self.layout_rng.next_u64();
        let mut generator =
            DungeonGenerator::new(GameRng::seeded(seed), self.config.generation_retries);
        let GeneratedFloor { graph, skipped_specials, repairs } =
            match generator.generate(self.config.target_room_count) {
                Ok(generated) => generated,
                Err(err) => {
                    error!(floor = self.floor, %err, "keeping the previous floor");
                    return Err(err);
                }
            };
        info!(
            floor = self.floor,
            rooms = graph.len(),
            skipped = ?skipped_specials,
            repairs = repairs.len(),
            "floor ready"
        );
        self.graph = graph;
        self.current_room = None;
        self.doors.clear();
        Ok(())
    }

    /// The spawn room, or the origin room if the spawn room could not be attached.
    pub fn spawn_room(&self) -> Option<RoomId> {
        self.graph
            .first_of_type(RoomType::SpawnRoom)
            .or_else(|| self.graph.rooms().first().map(|room| room.id))
    }

    pub fn move_to_room(
        &mut self,
        direction: Direction,
        living_enemies: usize,
        player: &mut dyn PlayerHandle,
    ) -> Result<RoomId, TransitionError> {
        let current = self.current_room.ok_or(TransitionError::MissingRoom)?;
        let result = if living_enemies > 0 {
            Err(TransitionError::EnemiesAlive(living_enemies))
        } else {
            match self.graph.room(current).map(|room| room.connection(direction)) {
                None => Err(TransitionError::MissingRoom),
                Some(None) => Err(TransitionError::NoConnection(direction)),
                Some(Some(target)) => self.load_room(target, Some(direction), player),
            }
        };
        if let Err(err) = &result {
            warn!(%current, %direction, %err, "room move rejected");
        }
        result
    }

    /// Makes `room` current. `from` is the direction the player travelled to
    /// get here; `None` drops the player in the middle of the room.
    pub fn load_room(
        &mut self,
        room: RoomId,
        from: Option<Direction>,
        player: &mut dyn PlayerHandle,
    ) -> Result<RoomId, TransitionError> {
        if self.graph.room(room).is_none() {
            error!(%room, floor = self.floor, "room to load is not on this floor");
            return Err(TransitionError::MissingRoom);
        }
        self.current_room = Some(room);
        player.despawn_bullets();

        let floor = self.floor;
        let (width, height) = (self.config.room_width, self.config.room_height);
        let decoration_rng = &mut self.decoration_rng;
        if let Some(entry) = self.graph.room_mut(room) {
            entry.visited = true;
            if entry.decorations.is_none() {
                let shape = room_shape(entry);
                entry.decorations =
                    Some(generate_decorations(decoration_rng, floor, shape, width, height));
            }
        }

        self.doors = self.build_doors(room);
        player.set_position(self.entry_point(from));
        self.cooldown.timer.restart(self.config.door_cooldown_ms);
        debug!(
            %room,
            floor,
            shape = ?self.room_shape(room),
            room_type = ?self.current_room_type(),
            "room loaded"
        );
        Ok(room)
    }

    /// Loads the room of the given type on this floor.
    pub fn load_room_of_type(
        &mut self,
        room_type: RoomType,
        player: &mut dyn PlayerHandle,
    ) -> Result<RoomId, TransitionError> {
        let room = self
            .graph
            .first_of_type(room_type)
            .ok_or(TransitionError::NoSuchRoomType(room_type))?;
        self.load_room(room, None, player)
    }

    pub fn load_spawn_room(&mut self, player: &mut dyn PlayerHandle) -> Result<RoomId, TransitionError> {
        let room = self.spawn_room().ok_or(TransitionError::MissingRoom)?;
        self.load_room(room, None, player)
    }

    fn build_doors(&self, room: RoomId) -> Vec<Door> {
        let Some(entry) = self.graph.room(room) else {
            return Vec::new();
        };
        entry
            .connections()
            .map(|(direction, destination)| {
                let tint = self
                    .graph
                    .room(destination)
                    .map_or(DoorTint::Plain, |target| DoorTint::for_destination(target.room_type));
                Door { direction, destination, region: self.door_region(direction), tint }
            })
            .collect()
    }

    pub fn door_region(&self, direction: Direction) -> Rect {
        let GameConfig { room_width: w, room_height: h, door_width, door_thickness, .. } =
            self.config;
        match direction {
            Direction::North => Rect::new(w / 2.0 - door_width / 2.0, 0.0, door_width, door_thickness),
            Direction::South => Rect::new(
                w / 2.0 - door_width / 2.0,
                h - door_thickness,
                door_width,
                door_thickness,
            ),
            Direction::West => Rect::new(0.0, h / 2.0 - door_width / 2.0, door_thickness, door_width),
            Direction::East => Rect::new(
                w - door_thickness,
                h / 2.0 - door_width / 2.0,
                door_thickness,
                door_width,
            ),
        }
    }

    /// Where the player lands after travelling `from`: just inside the
    /// opposite door, or the centre of the room.
    pub fn entry_point(&self, from: Option<Direction>) -> Point {
        let (w, h, offset) =
            (self.config.room_width, self.config.room_height, self.config.entrance_offset);
        match from {
            Some(Direction::North) => Point::new(w / 2.0, h - offset),
            Some(Direction::South) => Point::new(w / 2.0, offset),
            Some(Direction::East) => Point::new(offset, h / 2.0),
            Some(Direction::West) => Point::new(w - offset, h / 2.0),
            None => Point::new(w / 2.0, h / 2.0),
        }
    }

    /// The central hatch to the next floor, present only in a boss room below the last floor.
    pub fn next_floor_region(&self) -> Option<Rect> {
        if self.current_room_type() != Some(RoomType::BossRoom) || self.floor >= self.config.max_floors {
            return None;
        }
        let size = self.config.door_width;
        Some(Rect::centered(self.config.room_bounds().center(), size, size))
    }

    pub fn update(
        &mut self,
        dt_ms: u32,
        player: &mut dyn PlayerHandle,
        living_enemies: usize,
    ) -> Option<RoomEvent> {
        self.cooldown.timer.advance(dt_ms);
        let Some(current) = self.current_room else {
            warn!(err = %TransitionError::MissingRoom, "no current room, skipping door checks");
            return None;
        };
        if self.cooldown.is_active() {
            return None;
        }

        let bounds = player.bounds();
        let touched = self.doors.iter().find(|door| door.region.overlaps(&bounds)).copied();
        if let Some(door) = touched {
            return self
                .move_to_room(door.direction, living_enemies, player)
                .ok()
                .map(RoomEvent::Entered);
        }

        if let Some(hatch) = self.next_floor_region()
            && hatch.overlaps(&bounds)
        {
            debug!(%current, "player took the hatch");
            return self.move_to_next_floor(player).ok().map(RoomEvent::FloorAdvanced);
        }
        None
    }

    pub fn move_to_next_floor(&mut self, player: &mut dyn PlayerHandle) -> Result<u8, GenerationError> {
        let next = self.floor.saturating_add(1);
        self.change_floor(next, player)?;
        Ok(next)
    }

    /// Jumps to `floor`, builds it and loads its spawn room.
    pub fn reset_to_floor(&mut self, floor: u8, player: &mut dyn PlayerHandle) -> Result<u8, GenerationError> {
        self.change_floor(floor, player)?;
        Ok(floor)
    }

    fn change_floor(&mut self, floor: u8, player: &mut dyn PlayerHandle) -> Result<(), GenerationError> {
        let previous = self.floor;
        self.floor = floor;
        if let Err(err) = self.regenerate() {
            self.floor = previous;
            return Err(err);
        }
        info!(from = previous, to = floor, "floor changed");
        if let Err(err) = self.load_spawn_room(player) {
            error!(%err, floor, "new floor has no room to start in");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::test_support::StubPlayer;
    use crate::types::GridPos;

    /// Origin with a spawn room to the north and a boss room to the east.
    fn three_room_controller() -> RoomController {
        let mut graph = RoomGraph::new();
        let origin = graph.add_room(GridPos::ORIGIN, RoomType::Default).expect("origin");
        let north = graph
            .add_room(GridPos::ORIGIN.step(Direction::North), RoomType::SpawnRoom)
            .expect("north");
        let east = graph
            .add_room(GridPos::ORIGIN.step(Direction::East), RoomType::BossRoom)
            .expect("east");
        graph.connect(origin, Direction::North, north);
        graph.connect(origin, Direction::East, east);

        let mut controller =
            RoomController::new(GameConfig::default(), 7).expect("default floor generates");
        controller.graph = graph;
        controller
    }

    fn centre() -> StubPlayer {
        StubPlayer::at(Point::new(375.0, 375.0))
    }

    fn wait_out_cooldown(controller: &mut RoomController) {
        controller.cooldown.timer.clear();
    }

    #[test]
    fn doors_follow_connections_and_are_tinted_by_destination() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");

        let doors = controller.doors();
        assert_eq!(doors.len(), 2);
        let north = doors.iter().find(|door| door.direction == Direction::North).expect("north door");
        assert_eq!(north.tint, DoorTint::Spawn);
        assert_eq!(north.region, Rect::new(325.0, 0.0, 100.0, 20.0));
        let east = doors.iter().find(|door| door.direction == Direction::East).expect("east door");
        assert_eq!(east.tint, DoorTint::Boss);
        assert_eq!(east.region, Rect::new(730.0, 325.0, 20.0, 100.0));
    }

    #[test]
    fn missing_connection_or_living_enemies_leave_state_unchanged() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");

        assert_eq!(
            controller.move_to_room(Direction::West, 0, &mut player),
            Err(TransitionError::NoConnection(Direction::West))
        );
        assert_eq!(
            controller.move_to_room(Direction::North, 2, &mut player),
            Err(TransitionError::EnemiesAlive(2))
        );
        assert_eq!(controller.current_room(), Some(RoomId(0)));
        assert_eq!(player.pos, Point::new(375.0, 375.0));
    }

    #[test]
    fn moving_places_player_inside_the_opposite_door() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");

        assert_eq!(controller.move_to_room(Direction::North, 0, &mut player), Ok(RoomId(1)));
        assert_eq!(player.pos, Point::new(375.0, 700.0));
        assert_eq!(player.bullets_cleared, 2);
        assert!(controller.graph().room(RoomId(1)).is_some_and(|room| room.visited));
        assert!(controller.cooldown().is_active());

        let entered_east = controller.entry_point(Some(Direction::East));
        assert_eq!(entered_east, Point::new(50.0, 375.0));
        assert_eq!(controller.entry_point(Some(Direction::West)), Point::new(700.0, 375.0));
        assert_eq!(controller.entry_point(Some(Direction::South)), Point::new(375.0, 50.0));
    }

    #[test]
    fn cooldown_and_enemy_lock_block_door_triggers() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");
        player.pos = Point::new(375.0, 10.0);

        assert_eq!(controller.update(16, &mut player, 0), None, "cooldown still running");
        assert_eq!(controller.current_room(), Some(RoomId(0)));

        wait_out_cooldown(&mut controller);
        controller.set_enemy_lock(true);
        assert_eq!(controller.update(16, &mut player, 1), None);
        assert_eq!(controller.current_room(), Some(RoomId(0)));

        controller.set_enemy_lock(false);
        assert_eq!(controller.update(16, &mut player, 0), Some(RoomEvent::Entered(RoomId(1))));
    }

    #[test]
    fn hatch_only_exists_in_boss_rooms_below_the_last_floor() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");
        assert_eq!(controller.next_floor_region(), None);

        controller.load_room(RoomId(2), Some(Direction::East), &mut player).expect("boss loads");
        assert_eq!(controller.next_floor_region(), Some(Rect::new(325.0, 325.0, 100.0, 100.0)));

        controller.floor = controller.max_floors();
        assert_eq!(controller.next_floor_region(), None);
    }

    #[test]
    fn stepping_on_the_hatch_advances_the_floor() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(2), Some(Direction::East), &mut player).expect("boss loads");
        wait_out_cooldown(&mut controller);
        player.pos = Point::new(375.0, 375.0);

        assert_eq!(controller.update(16, &mut player, 0), Some(RoomEvent::FloorAdvanced(2)));
        assert_eq!(controller.floor(), 2);
        assert_eq!(controller.current_room_type(), Some(RoomType::SpawnRoom));
        assert_eq!(player.pos, Point::new(375.0, 375.0));
    }

    #[test]
    fn no_current_room_skips_updates() {
        let mut controller = RoomController::new(GameConfig::default(), 3).expect("floor");
        let mut player = centre();
        assert_eq!(controller.current_room(), None);
        assert_eq!(controller.update(16, &mut player, 0), None);
        assert_eq!(
            controller.move_to_room(Direction::North, 0, &mut player),
            Err(TransitionError::MissingRoom)
        );
    }

    #[test]
    fn loading_an_unknown_room_is_rejected() {
        let mut controller = three_room_controller();
        let mut player = centre();
        assert_eq!(
            controller.load_room(RoomId(40), None, &mut player),
            Err(TransitionError::MissingRoom)
        );
        assert_eq!(controller.current_room(), None);
        assert_eq!(
            controller.load_room_of_type(RoomType::ShopRoom, &mut player),
            Err(TransitionError::NoSuchRoomType(RoomType::ShopRoom))
        );
    }

    #[test]
    fn decorations_are_generated_once_per_room() {
        let mut controller = three_room_controller();
        let mut player = centre();
        controller.load_room(RoomId(0), None, &mut player).expect("origin loads");
        let first = controller.decorations().to_vec();
        controller.load_room(RoomId(1), None, &mut player).expect("north loads");
        controller.load_room(RoomId(0), None, &mut player).expect("origin reloads");
        assert_eq!(controller.decorations(), first.as_slice());
    }

    #[test]
    fn reset_to_floor_rebuilds_and_starts_in_the_spawn_room() {
        let mut controller = RoomController::new(GameConfig::default(), 21).expect("floor");
        let mut player = centre();
        assert_eq!(controller.reset_to_floor(3, &mut player), Ok(3));
        assert_eq!(controller.floor(), 3);
        assert_eq!(controller.current_room_type(), Some(RoomType::SpawnRoom));
        assert_eq!(controller.background_texture_key(), floor_tile(3));
    }

    struct NamedTextures;

    impl TextureSource for NamedTextures {
        type Handle = String;

        fn texture(&self, key: &str) -> Option<String> {
            Some(format!("tex:{key}"))
        }
    }

    #[test]
    fn background_resolves_through_texture_source() {
        let controller = RoomController::new(GameConfig::default(), 4).expect("floor");
        assert_eq!(
            controller.background_texture(&NamedTextures),
            Some(format!("tex:{}", floor_tile(STARTING_FLOOR)))
        );
    }
}
