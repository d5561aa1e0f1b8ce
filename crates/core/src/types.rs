use std::fmt;

use serde::Serialize;
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell of the floor layout grid. North is `y - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RoomType {
    #[default]
    Default,
    SpawnRoom,
    ShopRoom,
    BossRoom,
}

impl RoomType {
    pub const SPECIAL: [Self; 3] = [Self::SpawnRoom, Self::ShopRoom, Self::BossRoom];

    pub fn is_special(self) -> bool {
        !matches!(self, Self::Default)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::SpawnRoom => "spawn",
            Self::ShopRoom => "shop",
            Self::BossRoom => "boss",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RoomShape {
    DeadEnd,
    Vertical,
    Horizontal,
    LShape,
    TShape,
    CrossShape,
    Default,
}

/// Door colour hint so the player can tell where a door leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DoorTint {
    Spawn,
    Shop,
    Boss,
    Plain,
}

impl DoorTint {
    pub fn for_destination(room_type: RoomType) -> Self {
        match room_type {
            RoomType::SpawnRoom => Self::Spawn,
            RoomType::ShopRoom => Self::Shop,
            RoomType::BossRoom => Self::Boss,
            RoomType::Default => Self::Plain,
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Self::Spawn => 0x00ff00,
            Self::Shop => 0xffff00,
            Self::Boss => 0xff0000,
            Self::Plain => 0xffffff,
        }
    }
}

/// World-space position inside a room, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Moves towards `target` by at most `step` pixels.
    pub fn towards(self, target: Self, step: f32) -> Self {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = dx.hypot(dy);
        if distance <= step || distance == 0.0 {
            return target;
        }
        Self { x: self.x + dx / distance * step, y: self.y + dy / distance * step }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self { x: center.x - width / 2.0, y: center.y - height / 2.0, width, height }
    }

    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + self.width > other.x
            && self.x < other.x + other.width
            && self.y + self.height > other.y
            && self.y < other.y + other.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoomEntered { room: RoomId, room_type: RoomType, shape: RoomShape },
    FloorAdvanced { floor: u8 },
    EnemiesSpawned { room: RoomId, count: usize },
    EnemySplit { parent: EnemyId, children: [EnemyId; 2] },
    RoomCleared { room: RoomId },
    FinalBossDefeated,
    PlayerDied,
    PlayerRespawned,
}

/// Per-tick player intent, filled in by whatever front end drives the game.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub move_x: f32,
    pub move_y: f32,
    pub aim: Point,
    pub shoot: bool,
    pub reload: bool,
    pub dodge: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn stepping_there_and_back_returns_to_start() {
        let start = GridPos { x: 3, y: -2 };
        for direction in Direction::ALL {
            assert_eq!(start.step(direction).step(direction.opposite()), start);
        }
        assert_eq!(GridPos::ORIGIN.step(Direction::North), GridPos { x: 0, y: -1 });
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn towards_never_overshoots() {
        let from = Point::new(0.0, 0.0);
        let target = Point::new(3.0, 4.0);
        assert_eq!(from.towards(target, 10.0), target);
        let halfway = from.towards(target, 2.5);
        assert!((halfway.distance(target) - 2.5).abs() < 1e-4);
    }
}
