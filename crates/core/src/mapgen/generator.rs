//! Floor layout generation: a random walk over the grid grows the ordinary
//! rooms, then spawn/shop/boss rooms are hung off the edges.

use tracing::{debug, error, warn};

use super::graph::{ConnectionRepair, RoomGraph};
use crate::error::GenerationError;
use crate::rng::GameRng;
use crate::types::{Direction, GridPos, RoomId, RoomType};

/// Random draws allowed per requested room before an attempt is abandoned.
const DRAWS_PER_ROOM: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedFloor {
    pub graph: RoomGraph,
    /// Special rooms that found no attachment site.
    pub skipped_specials: Vec<RoomType>,
    pub repairs: Vec<ConnectionRepair>,
}

pub struct DungeonGenerator {
    rng: GameRng,
    retries: u32,
}

impl DungeonGenerator {
    pub fn new(rng: GameRng, retries: u32) -> Self {
        Self { rng, retries }
    }

    pub fn generate(&mut self, target_room_count: usize) -> Result<GeneratedFloor, GenerationError> {
        let mut attempt = 0;
        let mut graph = loop {
            match self.grow(target_room_count) {
                Ok(graph) => break graph,
                Err(err) if attempt < self.retries => {
                    warn!(attempt, %err, "room growth failed, retrying with a fresh frontier");
                    attempt += 1;
                }
                Err(err) => {
                    error!(attempts = attempt + 1, %err, "giving up on floor generation");
                    return Err(err);
                }
            }
        };

        let mut skipped_specials = Vec::new();
        for room_type in RoomType::SPECIAL {
            if let Err(err) = self.attach_special_room(&mut graph, room_type) {
                error!(%err, "special room skipped");
                skipped_specials.push(room_type);
            }
        }

        let repairs = graph.repair_connections();
        debug!(
            rooms = graph.len(),
            skipped = skipped_specials.len(),
            repairs = repairs.len(),
            "floor generated"
        );
        Ok(GeneratedFloor { graph, skipped_specials, repairs })
    }

    fn grow(&mut self, target_room_count: usize) -> Result<RoomGraph, GenerationError> {
        let mut graph = RoomGraph::new();
        let Some(origin) = graph.add_room(GridPos::ORIGIN, RoomType::Default) else {
            return Err(GenerationError::FrontierExhausted { built: 0, target: target_room_count });
        };
        let mut frontier = vec![origin];
        let mut draws = 0;

        while graph.len() < target_room_count {
            draws += 1;
            if frontier.is_empty() || draws > target_room_count * DRAWS_PER_ROOM {
                return Err(GenerationError::FrontierExhausted {
                    built: graph.len(),
                    target: target_room_count,
                });
            }

            let slot = self.rng.index(frontier.len());
            let current_id = frontier[slot];
            let Some(current) = graph.room(current_id) else {
                frontier.swap_remove(slot);
                continue;
            };
            let free = current.free_directions();
            let Some(&direction) = self.rng.choose(&free) else {
                frontier.swap_remove(slot);
                continue;
            };
            let cell = current.pos.step(direction);

            match graph.room_at(cell) {
                Some(existing) => {
                    let reverse_free = graph
                        .room(existing)
                        .is_some_and(|room| room.connection(direction.opposite()).is_none());
                    if reverse_free {
                        graph.connect(current_id, direction, existing);
                    }
                }
                None => {
                    if let Some(created) = graph.add_room(cell, RoomType::Default) {
                        graph.connect(current_id, direction, created);
                        frontier.push(created);
                    }
                }
            }
        }
        Ok(graph)
    }

    fn attach_special_room(
        &mut self,
        graph: &mut RoomGraph,
        room_type: RoomType,
    ) -> Result<RoomId, GenerationError> {
        let hosts: Vec<(RoomId, Vec<Direction>)> = graph
            .rooms()
            .iter()
            .filter(|room| {
                !room.is_special && room.connection_count() < 4 && !room.has_special_connection
            })
            .map(|room| {
                let open: Vec<Direction> = room
                    .free_directions()
                    .into_iter()
                    .filter(|&direction| graph.room_at(room.pos.step(direction)).is_none())
                    .collect();
                (room.id, open)
            })
            .filter(|(_, open)| !open.is_empty())
            .collect();

        let Some((host, open)) = self.rng.choose(&hosts) else {
            return Err(GenerationError::NoAttachmentSite(room_type));
        };
        let Some(&direction) = self.rng.choose(open) else {
            return Err(GenerationError::NoAttachmentSite(room_type));
        };
        let host = *host;
        let Some(cell) = graph.room(host).map(|room| room.pos.step(direction)) else {
            return Err(GenerationError::NoAttachmentSite(room_type));
        };
        let Some(special) = graph.add_room(cell, room_type) else {
            return Err(GenerationError::NoAttachmentSite(room_type));
        };

        graph.connect(host, direction, special);
        for id in [host, special] {
            if let Some(room) = graph.room_mut(id) {
                room.has_special_connection = true;
            }
        }
        debug!(%room_type, host = %host, %direction, room = %special, "special room attached");
        Ok(special)
    }
}
