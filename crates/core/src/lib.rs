pub mod config;
pub mod content;
pub mod controller;
pub mod coordinator;
pub mod debug;
pub mod enemy;
pub mod error;
pub mod game;
pub mod mapgen;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod timer;
pub mod types;

pub use config::GameConfig;
pub use controller::{Door, DoorCooldown, RoomController, RoomEvent, TextureSource};
pub use coordinator::{EnemyCoordinator, LatchChange};
pub use debug::{DebugCommand, DebugConsole};
pub use enemy::{BehaviorState, DamageOutcome, Enemy};
pub use error::{ConfigError, DebugError, GameError, GenerationError, TransitionError};
pub use game::Game;
pub use player::{Player, PlayerHandle};
pub use types::*;
