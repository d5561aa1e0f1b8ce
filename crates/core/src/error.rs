//! Error types for generation, room transitions, configuration, and the debug console.
//! Every failure here is recoverable: callers log and keep the tick loop running.

use std::io;
use std::path::PathBuf;

use crate::types::{Direction, RoomType};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The growth walk ran out of frontier (or draws) before reaching the target.
    #[error("frontier exhausted after {built} of {target} rooms")]
    FrontierExhausted { built: usize, target: usize },

    /// No ordinary room can host this special room.
    #[error("no attachment site left for the {0} room")]
    NoAttachmentSite(RoomType),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no connection to the {0}")]
    NoConnection(Direction),

    #[error("{0} enemies still alive in the current room")]
    EnemiesAlive(usize),

    #[error("room is not loaded on this floor")]
    MissingRoom,

    #[error("floor has no {0} room")]
    NoSuchRoomType(RoomType),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("dungeon generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not enter the first room: {0}")]
    Transition(#[from] TransitionError),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DebugError {
    #[error("debug commands are disabled; run `enable` first")]
    Disabled,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument `{value}` for `{command}`")]
    InvalidArgument { command: &'static str, value: String },

    #[error("floor {floor} is outside 1..={max}")]
    FloorOutOfRange { floor: u8, max: u8 },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
