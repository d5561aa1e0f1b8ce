//! Enemy lifecycle: spawning on room entry, per-tick behaviour, splitting on
//! death, and the clear/lock latch the room controller listens to.

use std::collections::BTreeSet;
use std::mem;

use slotmap::SlotMap;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::content::{EnemyKind, SpawnEntry, boss_table, enemy_stats, spawn_table};
use crate::enemy::{BehaviorContext, BehaviorState, DamageOutcome, Enemy};
use crate::player::PlayerHandle;
use crate::rng::GameRng;
use crate::types::{EnemyId, Point, Rect, RoomId, RoomType};

const SPAWN_ATTEMPTS: usize = 32;

/// Edge of the living-enemy count the controller locks doors on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatchChange {
    Locked,
    /// `cleared` is set the first time a room is emptied.
    Unlocked { cleared: Option<RoomId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitRecord {
    pub parent: EnemyId,
    pub children: [EnemyId; 2],
}

pub struct EnemyCoordinator {
    enemies: SlotMap<EnemyId, Enemy>,
    cleared_rooms: BTreeSet<RoomId>,
    locked: bool,
    player_down: bool,
    splits: Vec<SplitRecord>,
    rng: GameRng,
    config: GameConfig,
}

/// Greedy-random budget spend: repeatedly picks a weighted entry among those
/// still affordable until none is. Returns the picks and the unspent tokens.
pub fn plan_spawns(table: &[SpawnEntry], budget: u32, rng: &mut GameRng) -> (Vec<EnemyKind>, u32) {
    let mut remaining = budget;
    let mut picks = Vec::new();
    loop {
        let affordable: Vec<&SpawnEntry> =
            table.iter().filter(|entry| entry.cost > 0 && entry.cost <= remaining).collect();
        let weights: Vec<u32> = affordable.iter().map(|entry| entry.weight).collect();
        let Some(pick) = rng.weighted_index(&weights) else {
            break;
        };
        let entry = affordable[pick];
        picks.push(entry.kind);
        remaining -= entry.cost;
    }
    (picks, remaining)
}

impl EnemyCoordinator {
    pub fn new(config: GameConfig, rng: GameRng) -> Self {
        Self {
            enemies: SlotMap::with_key(),
            cleared_rooms: BTreeSet::new(),
            locked: false,
            player_down: false,
            splits: Vec::new(),
            rng,
            config,
        }
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    /// Room membership is a query over the canonical list.
    pub fn enemies_in(&self, room: RoomId) -> impl Iterator<Item = &Enemy> {
        self.enemies.values().filter(move |enemy| enemy.room == room)
    }

    pub fn living_in(&self, room: RoomId) -> usize {
        self.enemies_in(room).filter(|enemy| !enemy.is_dead()).count()
    }

    pub fn live_count(&self) -> usize {
        self.enemies.values().filter(|enemy| !enemy.is_dead()).count()
    }

    pub fn is_cleared(&self, room: RoomId) -> bool {
        self.cleared_rooms.contains(&room)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn spawn_enemies_for_room(
        &mut self,
        room: RoomId,
        room_type: RoomType,
        floor: u8,
        player_pos: Point,
    ) -> usize {
        if self.cleared_rooms.contains(&room) {
            debug!(%room, "room already cleared, nothing to spawn");
            return 0;
        }
        let kinds: Vec<EnemyKind> = match room_type {
            RoomType::SpawnRoom | RoomType::ShopRoom => return 0,
            RoomType::BossRoom => self.rng.choose(boss_table(floor)).copied().into_iter().collect(),
            RoomType::Default => {
                let (kinds, left) =
                    plan_spawns(spawn_table(floor), self.config.token_budget, &mut self.rng);
                debug!(%room, floor, spawned = kinds.len(), tokens_left = left, "spent token budget");
                kinds
            }
        };

        for &kind in &kinds {
            let pos = self.spawn_point(kind, player_pos);
            let initial = self.initial_state();
            self.insert(Enemy::new(kind, room, pos, initial));
        }
        if room_type == RoomType::BossRoom {
            info!(%room, floor, boss = ?kinds.first(), "boss spawned");
        }
        kinds.len()
    }

    /// Uniform point inside the room at least the safe distance from the
    /// player; the farthest candidate wins when no attempt qualifies.
    fn spawn_point(&mut self, kind: EnemyKind, player_pos: Point) -> Point {
        let half = enemy_stats(kind).size * enemy_stats(kind).scale / 2.0;
        let bounds = self.config.room_bounds();
        let area = Rect::new(
            half,
            half,
            (bounds.width - 2.0 * half).max(0.0),
            (bounds.height - 2.0 * half).max(0.0),
        );
        let mut best = area.center();
        let mut best_distance = f32::MIN;
        for _ in 0..SPAWN_ATTEMPTS {
            let candidate = self.rng.point_in(area);
            let distance = candidate.distance(player_pos);
            if distance >= self.config.spawn_safe_distance {
                return candidate;
            }
            if distance > best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    /// New enemies only chase while the player is alive.
    fn initial_state(&mut self) -> BehaviorState {
        if self.player_down {
            BehaviorState::Wandering { target: self.rng.point_in(self.config.room_bounds()) }
        } else {
            BehaviorState::Chasing
        }
    }

    fn insert(&mut self, enemy: Enemy) -> EnemyId {
        let id = self.enemies.insert(enemy);
        self.enemies[id].id = id;
        id
    }

    /// Advances every enemy of `current_room`, separates overlapping pairs,
    /// drops the dead and evaluates the latch.
    pub fn update(
        &mut self,
        player: &mut dyn PlayerHandle,
        current_room: RoomId,
    ) -> Option<LatchChange> {
        let mut context = BehaviorContext {
            player,
            rng: &mut self.rng,
            area: self.config.room_bounds(),
            contact_radius: self.config.contact_radius,
            arrival_threshold: self.config.arrival_threshold,
        };
        for enemy in self.enemies.values_mut().filter(|enemy| enemy.room == current_room) {
            enemy.step(&mut context);
        }
        self.separate(current_room);
        self.enemies.retain(|_, enemy| !enemy.is_dead());
        self.refresh_latch(current_room)
    }

    /// Pushes each pair closer than the minimum separation apart by half the
    /// overlap each, along the line between them.
    fn separate(&mut self, room: RoomId) {
        let min = self.config.min_separation;
        let ids: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|(_, enemy)| enemy.room == room && !enemy.is_dead())
            .map(|(id, _)| id)
            .collect();
        let mut positions: Vec<Point> = ids.iter().map(|&id| self.enemies[id].pos).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let (a, b) = (positions[i], positions[j]);
                let distance = a.distance(b);
                if distance >= min {
                    continue;
                }
                let push = (min - distance) / 2.0;
                let (nx, ny) = if distance == 0.0 {
                    (1.0, 0.0)
                } else {
                    ((b.x - a.x) / distance, (b.y - a.y) / distance)
                };
                positions[i] = Point::new(a.x - nx * push, a.y - ny * push);
                positions[j] = Point::new(b.x + nx * push, b.y + ny * push);
            }
        }
        for (id, pos) in ids.into_iter().zip(positions) {
            self.enemies[id].pos = pos;
        }
    }

    /// Re-evaluates the lock for `room`; needed after spawning as well as after updates.
    pub fn refresh_latch(&mut self, room: RoomId) -> Option<LatchChange> {
        let living = self.living_in(room);
        match (self.locked, living > 0) {
            (false, true) => {
                self.locked = true;
                debug!(%room, living, "room locked");
                Some(LatchChange::Locked)
            }
            (true, false) => {
                self.locked = false;
                let cleared = self.cleared_rooms.insert(room).then_some(room);
                if cleared.is_some() {
                    info!(%room, "room cleared");
                }
                Some(LatchChange::Unlocked { cleared })
            }
            _ => None,
        }
    }

    /// Applies projectile damage. Lethal hits on a splitting enemy below the
    /// maximum stage leave two children at the death position.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: i32) -> DamageOutcome {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return DamageOutcome::Ignored;
        };
        let outcome = enemy.take_damage(amount);
        if outcome != DamageOutcome::Killed {
            return outcome;
        }
        let children = enemy.split_children(self.config.max_split_stage, self.config.split_scale);
        let stage = enemy.stage;
        self.enemies.remove(id);
        if let Some([mut left, mut right]) = children {
            left.state = self.initial_state();
            right.state = self.initial_state();
            let children = [self.insert(left), self.insert(right)];
            debug!(?id, stage, "enemy split");
            self.splits.push(SplitRecord { parent: id, children });
        }
        outcome
    }

    pub fn drain_splits(&mut self) -> Vec<SplitRecord> {
        mem::take(&mut self.splits)
    }

    /// Every chasing enemy starts wandering. Returns how many switched.
    pub fn on_player_death(&mut self) -> usize {
        self.player_down = true;
        let area = self.config.room_bounds();
        let rng = &mut self.rng;
        self.enemies
            .values_mut()
            .map(|enemy| enemy.on_player_death(rng, area))
            .filter(|&switched| switched)
            .count()
    }

    pub fn on_player_respawn(&mut self) {
        self.player_down = false;
    }

    /// Kills every enemy in `room` outright, without splitting.
    pub fn kill_room(&mut self, room: RoomId) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|_, enemy| enemy.room != room);
        before - self.enemies.len()
    }

    /// Removes every enemy and resets the latch without reporting a clear.
    pub fn despawn_enemies(&mut self) {
        self.enemies.clear();
        self.splits.clear();
        self.locked = false;
    }

    pub fn forget_cleared_rooms(&mut self) {
        self.cleared_rooms.clear();
    }
}
