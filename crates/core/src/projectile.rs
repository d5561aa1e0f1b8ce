//! Shotgun pellets.

use crate::rng::GameRng;
use crate::types::{Point, Rect};

pub const PELLETS_PER_SHOT: usize = 5;
/// Total spread of one shot, in radians (about 15 degrees).
pub const PELLET_SPREAD: f32 = 0.2618;
pub const PELLET_SPEED: f32 = 5.0;
pub const PELLET_SIZE: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Point,
    /// Pixels per tick.
    pub velocity: Point,
    pub damage: i32,
}

impl Bullet {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, PELLET_SIZE, PELLET_SIZE)
    }

    pub fn advance(&mut self) {
        self.pos = Point::new(self.pos.x + self.velocity.x, self.pos.y + self.velocity.y);
    }
}

/// Fires one shell: every pellet leaves `origin` at a random angle within
/// half a spread either side of the aim.
pub fn fire_shell(rng: &mut GameRng, origin: Point, aim: Point, damage: i32) -> Vec<Bullet> {
    let dx = aim.x - origin.x;
    let dy = aim.y - origin.y;
    let heading = if dx == 0.0 && dy == 0.0 { 0.0 } else { dy.atan2(dx) };
    (0..PELLETS_PER_SHOT)
        .map(|_| {
            let angle = heading + (rng.unit() - 0.5) * PELLET_SPREAD;
            Bullet {
                pos: origin,
                velocity: Point::new(angle.cos() * PELLET_SPEED, angle.sin() * PELLET_SPEED),
                damage,
            }
        })
        .collect()
}

/// Moves every pellet one tick and drops those that left `area`.
pub fn advance_all(bullets: &mut Vec<Bullet>, area: Rect) {
    for bullet in bullets.iter_mut() {
        bullet.advance();
    }
    bullets.retain(|bullet| area.contains(bullet.pos));
}
