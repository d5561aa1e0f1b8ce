//! The player avatar and the narrow handle the room and enemy layers see it through.

use crate::projectile::{Bullet, fire_shell};
use crate::rng::GameRng;
use crate::timer::{Countdown, Timed};
use crate::types::{PlayerInput, Point, Rect};

pub const PLAYER_SIZE: f32 = 24.0;
pub const PLAYER_MAX_HP: i32 = 3;
pub const PLAYER_SPEED: f32 = 2.5;
pub const PLAYER_DAMAGE: i32 = 1;
pub const MAX_SHELLS: u8 = 4;
pub const SHOT_COOLDOWN_MS: u32 = 500;
pub const RELOAD_MS: u32 = 2000;
pub const DODGE_MS: u32 = 50;
pub const DODGE_SPEED: f32 = 10.0;
pub const DODGE_COOLDOWN_MS: u32 = 1500;
pub const HURT_INVULNERABILITY_MS: u32 = 500;

/// What rooms and enemies need from the player.
pub trait PlayerHandle {
    fn position(&self) -> Point;
    fn set_position(&mut self, pos: Point);
    fn bounds(&self) -> Rect;
    /// Returns whether the hit landed.
    fn take_damage(&mut self, amount: i32) -> bool;
    fn despawn_bullets(&mut self);
    fn is_dead(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reload;

pub struct Player {
    pos: Point,
    hp: i32,
    shells: u8,
    dead: bool,
    unkillable: bool,
    aim: Point,
    bullets: Vec<Bullet>,
    rng: GameRng,
    shot_cooldown: Countdown,
    dodge_cooldown: Countdown,
    hurt: Countdown,
    reload: Option<Timed<Reload>>,
    /// Phase carries the unit dodge direction.
    dodge: Option<Timed<Point>>,
}

impl Player {
    pub fn new(pos: Point, rng: GameRng) -> Self {
        Self {
            pos,
            hp: PLAYER_MAX_HP,
            shells: MAX_SHELLS,
            dead: false,
            unkillable: false,
            aim: pos,
            bullets: Vec::new(),
            rng,
            shot_cooldown: Countdown::idle(),
            dodge_cooldown: Countdown::idle(),
            hurt: Countdown::idle(),
            reload: None,
            dodge: None,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn shells(&self) -> u8 {
        self.shells
    }

    pub fn aim(&self) -> Point {
        self.aim
    }

    pub fn is_unkillable(&self) -> bool {
        self.unkillable
    }

    pub fn set_unkillable(&mut self, unkillable: bool) {
        self.unkillable = unkillable;
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.is_some()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.unkillable || self.is_dodging() || self.hurt.is_running()
    }

    /// Reload progress in `[0, 1]`, or `None` when not reloading.
    pub fn reload_progress(&self) -> Option<f32> {
        self.reload.as_ref().map(Timed::progress)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub(crate) fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.bullets
    }

    /// One simulation step: timers, movement, reload and shooting.
    pub fn update(&mut self, input: &PlayerInput, dt_ms: u32, area: Rect) {
        if self.dead {
            return;
        }
        self.shot_cooldown.advance(dt_ms);
        self.dodge_cooldown.advance(dt_ms);
        self.hurt.advance(dt_ms);
        if let Some(reload) = self.reload.as_mut()
            && reload.advance(dt_ms)
        {
            self.shells = MAX_SHELLS;
            self.reload = None;
        }

        let heading = normalized(input.move_x, input.move_y);
        if let Some(dodge) = self.dodge.as_mut() {
            let direction = dodge.phase;
            self.pos = Point::new(
                self.pos.x + direction.x * DODGE_SPEED,
                self.pos.y + direction.y * DODGE_SPEED,
            );
            if dodge.advance(dt_ms) {
                self.dodge = None;
            }
        } else if let Some(direction) = heading {
            if input.dodge && !self.dodge_cooldown.is_running() {
                self.dodge = Some(Timed::start(direction, DODGE_MS));
                self.dodge_cooldown.restart(DODGE_COOLDOWN_MS);
            } else {
                self.pos = Point::new(
                    self.pos.x + direction.x * PLAYER_SPEED,
                    self.pos.y + direction.y * PLAYER_SPEED,
                );
            }
        }
        self.pos = clamp_to(self.pos, area, PLAYER_SIZE / 2.0);
        self.aim = input.aim;

        if input.reload {
            self.start_reload();
        }
        if input.shoot {
            self.shoot();
        }
    }

    /// Starts a reload unless one is running or the gun is full. Reloads cannot be cancelled.
    pub fn start_reload(&mut self) -> bool {
        if self.reload.is_some() || self.shells >= MAX_SHELLS {
            return false;
        }
        self.reload = Some(Timed::start(Reload, RELOAD_MS));
        true
    }

    fn shoot(&mut self) -> bool {
        if self.shells == 0 || self.reload.is_some() || self.shot_cooldown.is_running() {
            return false;
        }
        let pellets = fire_shell(&mut self.rng, self.pos, self.aim, PLAYER_DAMAGE);
        self.bullets.extend(pellets);
        self.shells -= 1;
        self.shot_cooldown.restart(SHOT_COOLDOWN_MS);
        true
    }

    /// Back to full health and ammo at `pos`, keeping the unkillable flag.
    pub fn reset(&mut self, pos: Point) {
        self.pos = pos;
        self.aim = pos;
        self.hp = PLAYER_MAX_HP;
        self.shells = MAX_SHELLS;
        self.dead = false;
        self.bullets.clear();
        self.shot_cooldown.clear();
        self.dodge_cooldown.clear();
        self.hurt.clear();
        self.reload = None;
        self.dodge = None;
    }
}

impl PlayerHandle for Player {
    fn position(&self) -> Point {
        self.pos
    }

    fn set_position(&mut self, pos: Point) {
        self.pos = pos;
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE, PLAYER_SIZE)
    }

    fn take_damage(&mut self, amount: i32) -> bool {
        if self.dead || self.is_invulnerable() {
            return false;
        }
        self.hp -= amount;
        self.hurt.restart(HURT_INVULNERABILITY_MS);
        if self.hp <= 0 {
            self.hp = 0;
            self.dead = true;
        }
        true
    }

    fn despawn_bullets(&mut self) {
        self.bullets.clear();
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

fn normalized(x: f32, y: f32) -> Option<Point> {
    let length = x.hypot(y);
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    Some(Point::new(x / length, y / length))
}

fn clamp_to(pos: Point, area: Rect, margin: f32) -> Point {
    Point::new(
        pos.x.clamp(area.x + margin, area.x + area.width - margin),
        pos.y.clamp(area.y + margin, area.y + area.height - margin),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Records what was done to it; never moves on its own.
    pub(crate) struct StubPlayer {
        pub pos: Point,
        pub damage_taken: i32,
        pub bullets_cleared: u32,
        pub dead: bool,
    }

    impl StubPlayer {
        pub(crate) fn at(pos: Point) -> Self {
            Self { pos, damage_taken: 0, bullets_cleared: 0, dead: false }
        }
    }

    impl PlayerHandle for StubPlayer {
        fn position(&self) -> Point {
            self.pos
        }

        fn set_position(&mut self, pos: Point) {
            self.pos = pos;
        }

        fn bounds(&self) -> Rect {
            Rect::centered(self.pos, PLAYER_SIZE, PLAYER_SIZE)
        }

        fn take_damage(&mut self, amount: i32) -> bool {
            self.damage_taken += amount;
            true
        }

        fn despawn_bullets(&mut self) {
            self.bullets_cleared += 1;
        }

        fn is_dead(&self) -> bool {
            self.dead
        }
    }
}
