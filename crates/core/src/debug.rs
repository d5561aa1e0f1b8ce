//! Developer console: typed commands parsed from a line of text and applied
//! to an explicitly passed [`Game`]. Nothing runs until `enable` is issued.

use std::str::FromStr;

use tracing::info;

use crate::error::DebugError;
use crate::game::Game;
use crate::types::RoomType;

pub const HELP: &str =
    "commands: enable | floor <n> | room <spawn|shop|boss> | unkillable | regenerate | kill | help";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugCommand {
    Enable,
    Floor(u8),
    Room(RoomType),
    Unkillable,
    Regenerate,
    Kill,
    Help,
}

impl FromStr for DebugCommand {
    type Err = DebugError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(DebugError::UnknownCommand(String::new()));
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "enable" => Self::Enable,
            "floor" => {
                let value = words.next().ok_or(DebugError::MissingArgument("floor"))?;
                let floor = value.parse().map_err(|_| DebugError::InvalidArgument {
                    command: "floor",
                    value: value.to_owned(),
                })?;
                Self::Floor(floor)
            }
            "room" => {
                let value = words.next().ok_or(DebugError::MissingArgument("room"))?;
                let room_type = match value.to_ascii_lowercase().as_str() {
                    "spawn" => RoomType::SpawnRoom,
                    "shop" => RoomType::ShopRoom,
                    "boss" => RoomType::BossRoom,
                    _ => {
                        return Err(DebugError::InvalidArgument {
                            command: "room",
                            value: value.to_owned(),
                        });
                    }
                };
                Self::Room(room_type)
            }
            "unkillable" => Self::Unkillable,
            "regenerate" => Self::Regenerate,
            "kill" => Self::Kill,
            "help" => Self::Help,
            _ => return Err(DebugError::UnknownCommand(head.to_owned())),
        };
        Ok(command)
    }
}

#[derive(Debug, Default)]
pub struct DebugConsole {
    enabled: bool,
}

impl DebugConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Parses and runs one line, returning the message to show the user.
    pub fn run_line(&mut self, line: &str, game: &mut Game) -> Result<String, DebugError> {
        let command: DebugCommand = line.parse()?;
        self.dispatch(command, game)
    }

    pub fn dispatch(&mut self, command: DebugCommand, game: &mut Game) -> Result<String, DebugError> {
        if !self.enabled && !matches!(command, DebugCommand::Enable | DebugCommand::Help) {
            return Err(DebugError::Disabled);
        }

        let message = match command {
            DebugCommand::Enable => {
                self.enabled = true;
                "debug commands enabled".to_owned()
            }
            DebugCommand::Help => HELP.to_owned(),
            DebugCommand::Floor(floor) => {
                let max = game.rooms().max_floors();
                if floor == 0 || floor > max {
                    return Err(DebugError::FloorOutOfRange { floor, max });
                }
                game.teleport_to_floor(floor)?;
                format!("teleported to floor {floor}")
            }
            DebugCommand::Room(room_type) => {
                let room = game.teleport_to_room(room_type)?;
                format!("teleported to {room_type} {room}")
            }
            DebugCommand::Unkillable => {
                let unkillable = !game.player().is_unkillable();
                game.set_unkillable(unkillable);
                if unkillable { "player is unkillable" } else { "player is mortal again" }.to_owned()
            }
            DebugCommand::Regenerate => {
                let floor = game.regenerate_floor()?;
                format!("regenerated floor {floor}")
            }
            DebugCommand::Kill => format!("killed {} enemies", game.kill_room_enemies()),
        };
        info!(?command, %message, "debug command");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn game() -> Game {
        Game::new(17, GameConfig::default()).expect("game builds")
    }

    #[test]
    fn parses_every_command() {
        assert_eq!("enable".parse::<DebugCommand>(), Ok(DebugCommand::Enable));
        assert_eq!("  floor 3 ".parse::<DebugCommand>(), Ok(DebugCommand::Floor(3)));
        assert_eq!("room Boss".parse::<DebugCommand>(), Ok(DebugCommand::Room(RoomType::BossRoom)));
        assert_eq!("room shop".parse::<DebugCommand>(), Ok(DebugCommand::Room(RoomType::ShopRoom)));
        assert_eq!("UNKILLABLE".parse::<DebugCommand>(), Ok(DebugCommand::Unkillable));
        assert_eq!("regenerate".parse::<DebugCommand>(), Ok(DebugCommand::Regenerate));
        assert_eq!("kill".parse::<DebugCommand>(), Ok(DebugCommand::Kill));
        assert_eq!("help".parse::<DebugCommand>(), Ok(DebugCommand::Help));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("dance".parse::<DebugCommand>(), Err(DebugError::UnknownCommand("dance".into())));
        assert_eq!("floor".parse::<DebugCommand>(), Err(DebugError::MissingArgument("floor")));
        assert_eq!(
            "floor two".parse::<DebugCommand>(),
            Err(DebugError::InvalidArgument { command: "floor", value: "two".into() })
        );
        assert_eq!(
            "room attic".parse::<DebugCommand>(),
            Err(DebugError::InvalidArgument { command: "room", value: "attic".into() })
        );
    }

    #[test]
    fn commands_require_enable_first() {
        let mut console = DebugConsole::new();
        let mut game = game();
        assert_eq!(console.run_line("floor 2", &mut game), Err(DebugError::Disabled));
        assert_eq!(game.rooms().floor(), 1);
        assert!(console.run_line("help", &mut game).is_ok());

        console.run_line("enable", &mut game).expect("enable always works");
        assert!(console.is_enabled());
        console.run_line("floor 2", &mut game).expect("floor 2 exists");
        assert_eq!(game.rooms().floor(), 2);
        assert_eq!(game.rooms().current_room_type(), Some(RoomType::SpawnRoom));
    }

    #[test]
    fn floor_range_is_validated() {
        let mut console = DebugConsole { enabled: true };
        let mut game = game();
        assert_eq!(
            console.dispatch(DebugCommand::Floor(0), &mut game),
            Err(DebugError::FloorOutOfRange { floor: 0, max: 4 })
        );
        assert_eq!(
            console.dispatch(DebugCommand::Floor(5), &mut game),
            Err(DebugError::FloorOutOfRange { floor: 5, max: 4 })
        );
    }

    #[test]
    fn room_teleport_clears_enemies_before_loading() {
        let mut console = DebugConsole { enabled: true };
        let mut game = game();
        console.dispatch(DebugCommand::Room(RoomType::BossRoom), &mut game).expect("boss room");
        assert_eq!(game.enemies().live_count(), 1);
        assert!(game.rooms().cooldown().enemy_lock);

        console.dispatch(DebugCommand::Room(RoomType::ShopRoom), &mut game).expect("shop room");
        assert_eq!(game.enemies().live_count(), 0);
        assert!(!game.rooms().cooldown().enemy_lock);
        assert_eq!(game.rooms().current_room_type(), Some(RoomType::ShopRoom));
    }

    #[test]
    fn unkillable_toggles_and_kill_empties_the_room() {
        let mut console = DebugConsole { enabled: true };
        let mut game = game();
        console.dispatch(DebugCommand::Unkillable, &mut game).expect("toggle");
        assert!(game.player().is_unkillable());
        console.dispatch(DebugCommand::Unkillable, &mut game).expect("toggle back");
        assert!(!game.player().is_unkillable());

        console.dispatch(DebugCommand::Room(RoomType::BossRoom), &mut game).expect("boss room");
        let message = console.dispatch(DebugCommand::Kill, &mut game).expect("kill");
        assert_eq!(message, "killed 1 enemies");
        assert!(!game.rooms().cooldown().enemy_lock);
    }

    #[test]
    fn regenerate_keeps_the_floor_number() {
        let mut console = DebugConsole { enabled: true };
        let mut game = game();
        let before = game.rooms().graph().fingerprint();
        console.dispatch(DebugCommand::Regenerate, &mut game).expect("regenerate");
        assert_eq!(game.rooms().floor(), 1);
        assert_ne!(game.rooms().graph().fingerprint(), before);
    }
}
