//! Text shown around the play field: status line, player stats and the event feed.

use crawler_core::{Game, GameEvent};

use crate::app_loop::AppMode;
use crate::{format_seed, format_snapshot_hash};

pub fn status_text(mode: &AppMode) -> String {
    match mode {
        AppMode::Playing => "WASD move, mouse aim, click/Space shoot, R reload, Shift dodge".to_owned(),
        AppMode::Paused => "Paused (Esc to resume, ` for console)".to_owned(),
        AppMode::Console { line } => format!("> {line}_"),
        AppMode::Finished => "The king has fallen. Run complete!".to_owned(),
    }
}

pub fn stats_lines(game: &Game) -> Vec<String> {
    let rooms = game.rooms();
    let player = game.player();
    let mut lines = vec![
        format!("Seed {}", format_seed(game.seed())),
        format!("Floor {}/{}", rooms.floor(), rooms.max_floors()),
        format!("State {}", format_snapshot_hash(game.snapshot_hash())),
    ];
    if let Some(room) = rooms.current_room().and_then(|id| rooms.graph().room(id)) {
        lines.push(format!("Room {} {} ({:?})", room.id, room.room_type, room.shape()));
    }
    lines.push(format!("HP {}", player.hp()));
    lines.push(match player.reload_progress() {
        Some(progress) => format!("Reloading {:.0}%", progress * 100.0),
        None => format!("Shells {}", player.shells()),
    });
    if let Some(room) = rooms.current_room() {
        lines.push(format!("Enemies {}", game.enemies().living_in(room)));
    }
    if rooms.cooldown().enemy_lock {
        lines.push("Doors sealed".to_owned());
    }
    if player.is_unkillable() {
        lines.push("UNKILLABLE".to_owned());
    }
    if game.is_respawning() {
        lines.push("You died. Respawning...".to_owned());
    }
    lines
}

pub fn event_line(event: &GameEvent) -> String {
    match event {
        GameEvent::RoomEntered { room, room_type, shape } => {
            format!("Entered {room_type} {room} ({shape:?})")
        }
        GameEvent::FloorAdvanced { floor } => format!("Descended to floor {floor}"),
        GameEvent::EnemiesSpawned { count, .. } => format!("{count} enemies appear"),
        GameEvent::EnemySplit { .. } => "A slime splits in two".to_owned(),
        GameEvent::RoomCleared { room } => format!("Room {room} cleared"),
        GameEvent::FinalBossDefeated => "Final boss defeated".to_owned(),
        GameEvent::PlayerDied => "You died".to_owned(),
        GameEvent::PlayerRespawned => "Back at floor 1".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawler_core::{GameConfig, RoomId};

    #[test]
    fn stats_start_with_seed_and_floor() {
        let game = Game::new(77, GameConfig::default()).expect("game builds");
        let lines = stats_lines(&game);
        assert_eq!(lines[0], "Seed 77");
        assert_eq!(lines[1], "Floor 1/4");
        assert_eq!(lines[2], format!("State {}", format_snapshot_hash(game.snapshot_hash())));
        assert!(lines.iter().any(|line| line == "Shells 4"));
        assert!(!lines.iter().any(|line| line == "Doors sealed"));
    }

    #[test]
    fn console_status_echoes_the_line() {
        let mode = AppMode::Console { line: "floor 2".to_owned() };
        assert_eq!(status_text(&mode), "> floor 2_");
    }

    #[test]
    fn events_read_as_sentences() {
        assert_eq!(event_line(&GameEvent::RoomCleared { room: RoomId(4) }), "Room #4 cleared");
        assert_eq!(event_line(&GameEvent::FloorAdvanced { floor: 3 }), "Descended to floor 3");
    }
}
