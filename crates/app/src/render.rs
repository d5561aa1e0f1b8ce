//! Drawing for the room view, the stats panel and overlays.

use app::app_loop::{AppMode, AppState};
use app::hud::{event_line, stats_lines, status_text};
use crawler_core::content::EnemyKind;
use crawler_core::mapgen::non_overlapping;
use crawler_core::player::PLAYER_SIZE;
use crawler_core::projectile::PELLET_SIZE;
use crawler_core::{Game, PlayerHandle, Point, Rect, TextureSource};
use macroquad::prelude::*;

use crate::textures::FlatColors;

const PANEL_PAD_X: f32 = 15.0;
const PANEL_PAD_Y: f32 = 25.0;
const LINE_HEIGHT: f32 = 20.0;
const FONT_SIZE: f32 = 20.0;
const BORDER_COLOR: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };
const HATCH_COLOR: Color = Color { r: 0.6, g: 0.05, b: 0.05, a: 1.0 };

/// Maps room coordinates onto the left part of the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomView {
    pub scale: f32,
}

impl RoomView {
    pub fn fit(room_height: f32) -> Self {
        Self { scale: screen_height() / room_height }
    }

    pub fn to_room(&self, x: f32, y: f32) -> Point {
        Point::new(x / self.scale, y / self.scale)
    }

    fn rect(&self, rect: Rect, color: Color) {
        draw_rectangle(
            rect.x * self.scale,
            rect.y * self.scale,
            rect.width * self.scale,
            rect.height * self.scale,
            color,
        );
    }

    fn circle(&self, center: Point, radius: f32, color: Color) {
        draw_circle(center.x * self.scale, center.y * self.scale, radius * self.scale, color);
    }
}

pub fn draw_frame(game: &Game, app_state: &AppState, view: &RoomView) {
    clear_background(BLACK);
    draw_room(game, view);
    draw_actors(game, view);
    draw_panel(game, app_state, view);
    draw_overlays(game, app_state, view);
}

fn draw_room(game: &Game, view: &RoomView) {
    let rooms = game.rooms();
    let background = rooms.background_texture(&FlatColors).unwrap_or(DARKGRAY);
    view.rect(game.config().room_bounds(), background);

    for decoration in non_overlapping(rooms.decorations()) {
        let color = FlatColors.texture(decoration.tile).unwrap_or(GRAY);
        view.rect(decoration.bounds(), color);
    }

    let sealed = rooms.cooldown().enemy_lock;
    for door in rooms.doors() {
        let color = if sealed { BORDER_COLOR } else { Color::from_hex(door.tint.rgb()) };
        view.rect(door.region, color);
    }
    if let Some(hatch) = rooms.next_floor_region() {
        view.rect(hatch, if sealed { BORDER_COLOR } else { HATCH_COLOR });
    }
}

fn draw_actors(game: &Game, view: &RoomView) {
    for enemy in game.enemies().enemies() {
        let color = match enemy.kind {
            EnemyKind::Slime => GREEN,
            EnemyKind::SplittingSlime => LIME,
            EnemyKind::KingSlime => PURPLE,
        };
        view.circle(enemy.pos, enemy.size() / 2.0, color);
    }

    let player = game.player();
    for bullet in player.bullets() {
        view.circle(bullet.pos, PELLET_SIZE / 2.0, YELLOW);
    }
    if !game.is_respawning() {
        let color = if player.is_invulnerable() { SKYBLUE } else { BLUE };
        view.rect(Rect::centered(player.position(), PLAYER_SIZE, PLAYER_SIZE), color);
    }
}

fn draw_panel(game: &Game, app_state: &AppState, view: &RoomView) {
    let left = game.config().room_width * view.scale;
    draw_rectangle_lines(left, 0.0, screen_width() - left, screen_height(), 1.0, BORDER_COLOR);

    let text_x = left + PANEL_PAD_X;
    let mut text_y = PANEL_PAD_Y;
    for line in stats_lines(game) {
        draw_text(&line, text_x, text_y, FONT_SIZE, WHITE);
        text_y += LINE_HEIGHT;
    }

    text_y += LINE_HEIGHT;
    for event in app_state.recent_events.iter().rev() {
        draw_text(&event_line(event), text_x, text_y, FONT_SIZE * 0.8, LIGHTGRAY);
        text_y += LINE_HEIGHT * 0.8;
    }
}

fn draw_overlays(game: &Game, app_state: &AppState, view: &RoomView) {
    let room_width = game.config().room_width * view.scale;
    let status = status_text(&app_state.mode);
    draw_text(&status, PANEL_PAD_X, screen_height() - PANEL_PAD_X, FONT_SIZE, WHITE);

    match &app_state.mode {
        AppMode::Console { .. } => {
            let height = LINE_HEIGHT * (app_state.console_log.len() as f32 + 1.5);
            draw_rectangle(0.0, 0.0, room_width, height, Color::new(0.0, 0.0, 0.0, 0.75));
            let mut y = LINE_HEIGHT;
            for line in &app_state.console_log {
                draw_text(line, PANEL_PAD_X, y, FONT_SIZE, LIGHTGRAY);
                y += LINE_HEIGHT;
            }
        }
        AppMode::Paused | AppMode::Finished => {
            draw_rectangle(0.0, 0.0, room_width, screen_height(), Color::new(0.0, 0.0, 0.0, 0.5));
        }
        AppMode::Playing => {}
    }
}
