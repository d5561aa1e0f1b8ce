//! Room graph storage: an arena of rooms with four compass links each.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::warn;
use xxhash_rust::xxh3::xxh3_64;

use super::decorations::Decoration;
use crate::types::{Direction, GridPos, RoomId, RoomShape, RoomType};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub pos: GridPos,
    connections: [Option<RoomId>; 4],
    pub visited: bool,
    pub is_special: bool,
    pub has_special_connection: bool,
    pub room_type: RoomType,
    pub decorations: Option<Vec<Decoration>>,
}

impl Room {
    pub(crate) fn new(id: RoomId, pos: GridPos, room_type: RoomType) -> Self {
        Self {
            id,
            pos,
            connections: [None; 4],
            visited: false,
            is_special: room_type.is_special(),
            has_special_connection: false,
            room_type,
            decorations: None,
        }
    }

    pub fn connection(&self, direction: Direction) -> Option<RoomId> {
        self.connections[direction.slot()]
    }

    pub(crate) fn set_connection(&mut self, direction: Direction, target: Option<RoomId>) {
        self.connections[direction.slot()] = target;
    }

    pub fn connections(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        Direction::ALL.into_iter().filter_map(|direction| {
            self.connection(direction).map(|target| (direction, target))
        })
    }

    pub fn connection_count(&self) -> usize {
        self.connections.iter().flatten().count()
    }

    pub fn free_directions(&self) -> Vec<Direction> {
        Direction::ALL.into_iter().filter(|&direction| self.connection(direction).is_none()).collect()
    }

    pub fn shape(&self) -> RoomShape {
        room_shape(self)
    }
}

/// Classifies a room by how many doors it has and where they are.
/// Only used to pick decoration and texture variants.
pub fn room_shape(room: &Room) -> RoomShape {
    let has = |direction| room.connection(direction).is_some();
    match room.connection_count() {
        1 => RoomShape::DeadEnd,
        2 if has(Direction::North) && has(Direction::South) => RoomShape::Vertical,
        2 if has(Direction::East) && has(Direction::West) => RoomShape::Horizontal,
        2 => RoomShape::LShape,
        3 => RoomShape::TShape,
        4 => RoomShape::CrossShape,
        _ => RoomShape::Default,
    }
}

/// A link that pointed one way only and was overwritten to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionRepair {
    pub room: RoomId,
    pub direction: Direction,
    pub neighbor: RoomId,
    pub previous: Option<RoomId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    #[serde(skip)]
    cells: BTreeMap<GridPos, RoomId>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.index())
    }

    pub fn room_at(&self, pos: GridPos) -> Option<RoomId> {
        self.cells.get(&pos).copied()
    }

    pub fn first_of_type(&self, room_type: RoomType) -> Option<RoomId> {
        self.rooms.iter().find(|room| room.room_type == room_type).map(|room| room.id)
    }

    pub fn count_of_type(&self, room_type: RoomType) -> usize {
        self.rooms.iter().filter(|room| room.room_type == room_type).count()
    }

    pub fn neighbor(&self, id: RoomId, direction: Direction) -> Option<&Room> {
        self.room(id)?.connection(direction).and_then(|target| self.room(target))
    }

    /// Adds a room on an empty cell. Returns `None` if the cell is taken.
    pub(crate) fn add_room(&mut self, pos: GridPos, room_type: RoomType) -> Option<RoomId> {
        if self.cells.contains_key(&pos) {
            return None;
        }
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Room::new(id, pos, room_type));
        self.cells.insert(pos, id);
        Some(id)
    }

    /// Links `from` to `to` in `direction` and `to` back to `from`.
    pub(crate) fn connect(&mut self, from: RoomId, direction: Direction, to: RoomId) {
        if let Some(room) = self.room_mut(from) {
            room.set_connection(direction, Some(to));
        }
        if let Some(room) = self.room_mut(to) {
            room.set_connection(direction.opposite(), Some(from));
        }
    }

    /// Forces every link to be mirrored by its neighbour, logging each fix.
    pub fn repair_connections(&mut self) -> Vec<ConnectionRepair> {
        let mut repairs = Vec::new();
        for index in 0..self.rooms.len() {
            let room_id = self.rooms[index].id;
            for direction in Direction::ALL {
                let Some(neighbor_id) = self.rooms[index].connection(direction) else {
                    continue;
                };
                let reverse = direction.opposite();
                let Some(neighbor) = self.room_mut(neighbor_id) else {
                    warn!(room = %room_id, %direction, neighbor = %neighbor_id, "dangling connection removed");
                    self.rooms[index].set_connection(direction, None);
                    continue;
                };
                let previous = neighbor.connection(reverse);
                if previous != Some(room_id) {
                    warn!(
                        room = %room_id,
                        %direction,
                        neighbor = %neighbor_id,
                        "connection mismatch: reverse link missing, repairing"
                    );
                    neighbor.set_connection(reverse, Some(room_id));
                    repairs.push(ConnectionRepair {
                        room: room_id,
                        direction,
                        neighbor: neighbor_id,
                        previous,
                    });
                }
            }
        }
        repairs
    }

    pub fn is_symmetric(&self) -> bool {
        self.rooms.iter().all(|room| {
            room.connections().all(|(direction, target)| {
                self.room(target)
                    .is_some_and(|other| other.connection(direction.opposite()) == Some(room.id))
            })
        })
    }

    /// Rooms reachable from `start` by following connections.
    pub fn reachable_from(&self, start: RoomId) -> Vec<RoomId> {
        let mut seen = vec![false; self.rooms.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if self.room(start).is_some() {
            seen[start.index()] = true;
            queue.push_back(start);
        }
        while let Some(id) = queue.pop_front() {
            order.push(id);
            let Some(room) = self.room(id) else { continue };
            for (_, target) in room.connections() {
                if let Some(flag) = seen.get_mut(target.index())
                    && !*flag
                {
                    *flag = true;
                    queue.push_back(target);
                }
            }
        }
        order
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.pos.x.to_le_bytes());
            bytes.extend(room.pos.y.to_le_bytes());
            bytes.push(match room.room_type {
                RoomType::Default => 0,
                RoomType::SpawnRoom => 1,
                RoomType::ShopRoom => 2,
                RoomType::BossRoom => 3,
            });
            for direction in Direction::ALL {
                let link = room.connection(direction).map_or(u32::MAX, |id| id.0);
                bytes.extend(link.to_le_bytes());
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
