//! A single enemy and its behaviour state machine.
//!
//! ```text
//! Chasing --player death--> Wandering --arrived--> Wandering (new waypoint)
//! Chasing | Wandering --lethal damage--> Dead
//! ```
//!
//! Splitting kinds leave two smaller, faster children when they die below the
//! maximum stage. The coordinator owns enemies; this module only mutates one
//! enemy at a time.

use crate::content::{EnemyKind, SPEED_PER_TIER, enemy_stats};
use crate::player::PlayerHandle;
use crate::rng::GameRng;
use crate::types::{EnemyId, Point, Rect, RoomId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BehaviorState {
    Chasing,
    Wandering { target: Point },
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Hurt { remaining: i32 },
    Killed,
    /// The enemy was already dead; nothing happened.
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub room: RoomId,
    pub pos: Point,
    pub hp: i32,
    pub stage: u8,
    pub scale: f32,
    pub speed_tier: u8,
    pub damage: i32,
    pub state: BehaviorState,
}

pub(crate) struct BehaviorContext<'a> {
    pub player: &'a mut dyn PlayerHandle,
    pub rng: &'a mut GameRng,
    pub area: Rect,
    pub contact_radius: f32,
    pub arrival_threshold: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, room: RoomId, pos: Point, initial_state: BehaviorState) -> Self {
        let stats = enemy_stats(kind);
        Self {
            id: EnemyId::default(),
            kind,
            room,
            pos,
            hp: stats.hp,
            stage: 0,
            scale: stats.scale,
            speed_tier: 0,
            damage: stats.damage,
            state: initial_state,
        }
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.state, BehaviorState::Dead)
    }

    pub fn speed(&self) -> f32 {
        enemy_stats(self.kind).base_speed * (1.0 + f32::from(self.speed_tier) * SPEED_PER_TIER)
    }

    pub fn size(&self) -> f32 {
        enemy_stats(self.kind).size * self.scale
    }

    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::centered(self.pos, size, size)
    }

    /// Applies damage; death is reported exactly once.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        self.hp -= amount.max(0);
        if self.hp <= 0 {
            self.state = BehaviorState::Dead;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt { remaining: self.hp }
        }
    }

    /// Switches a chasing enemy to wandering. Returns whether the state changed.
    pub fn on_player_death(&mut self, rng: &mut GameRng, area: Rect) -> bool {
        if !matches!(self.state, BehaviorState::Chasing) {
            return false;
        }
        self.state = BehaviorState::Wandering { target: rng.point_in(area) };
        true
    }

    pub fn splits_at(&self, max_stage: u8) -> bool {
        enemy_stats(self.kind).splits && self.stage < max_stage
    }

    /// The two children left behind at the death position, or `None` when this
    /// enemy does not split any further.
    pub fn split_children(&self, max_stage: u8, split_scale: f32) -> Option<[Enemy; 2]> {
        if !self.splits_at(max_stage) {
            return None;
        }
        let stage = self.stage + 1;
        let base_hp = enemy_stats(self.kind).hp;
        let child = Enemy {
            id: EnemyId::default(),
            kind: self.kind,
            room: self.room,
            pos: self.pos,
            hp: (base_hp >> stage).max(1),
            stage,
            scale: self.scale * split_scale,
            speed_tier: self.speed_tier.saturating_add(1),
            damage: self.damage,
            state: BehaviorState::Chasing,
        };
        Some([child.clone(), child])
    }

    pub(crate) fn step(&mut self, context: &mut BehaviorContext<'_>) {
        match self.state {
            BehaviorState::Dead => {}
            BehaviorState::Chasing => {
                let target = context.player.position();
                if self.pos.distance(target) < context.contact_radius * self.scale {
                    context.player.take_damage(self.damage);
                }
                self.pos = self.pos.towards(target, self.speed());
            }
            BehaviorState::Wandering { target } => {
                self.pos = self.pos.towards(target, self.speed());
                if self.pos.distance(target) <= context.arrival_threshold {
                    self.state = BehaviorState::Wandering { target: context.rng.point_in(context.area) };
                }
            }
        }
    }
}
