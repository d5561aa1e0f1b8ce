//! Tunable game constants, loadable from TOML.
//!
//! Every field has a default matching the shipped game, so a config file only
//! needs to list the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::player::PLAYER_SIZE;
use crate::types::Rect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Fixed simulation step in milliseconds.
    pub tick_ms: u32,

    pub room_width: f32,
    pub room_height: f32,
    /// Length of a door along its wall.
    pub door_width: f32,
    /// Depth of a door into the room.
    pub door_thickness: f32,
    pub door_cooldown_ms: u32,
    /// How far inside the entrance door the player lands.
    pub entrance_offset: f32,

    /// Ordinary rooms per floor, before spawn/shop/boss are attached.
    pub target_room_count: usize,
    pub generation_retries: u32,
    pub max_floors: u8,

    pub token_budget: u32,
    pub spawn_safe_distance: f32,
    pub min_separation: f32,
    pub contact_radius: f32,
    pub arrival_threshold: f32,
    pub max_split_stage: u8,
    pub split_scale: f32,

    pub respawn_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            room_width: 750.0,
            room_height: 750.0,
            door_width: 100.0,
            door_thickness: 20.0,
            door_cooldown_ms: 1000,
            entrance_offset: 50.0,
            target_room_count: 6,
            generation_retries: 8,
            max_floors: 4,
            token_budget: 10,
            spawn_safe_distance: 100.0,
            min_separation: 30.0,
            contact_radius: 15.0,
            arrival_threshold: 8.0,
            max_split_stage: 2,
            split_scale: 0.6,
            respawn_delay_ms: 2000,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be positive"));
        }
        if self.room_width <= 0.0 || self.room_height <= 0.0 {
            return Err(invalid("room_width", "room dimensions must be positive"));
        }
        if self.door_width <= 0.0
            || self.door_width > self.room_width.min(self.room_height)
            || self.door_thickness <= 0.0
        {
            return Err(invalid("door_width", "doors must be positive and fit on every wall"));
        }
        let door_clearance = self.door_thickness + PLAYER_SIZE / 2.0;
        if self.entrance_offset <= door_clearance
            || self.entrance_offset * 2.0 >= self.room_width.min(self.room_height)
        {
            return Err(invalid(
                "entrance_offset",
                format!("must clear the door ({door_clearance}) and stay inside the room"),
            ));
        }
        if self.target_room_count == 0 {
            return Err(invalid("target_room_count", "need at least one room"));
        }
        if self.max_floors == 0 {
            return Err(invalid("max_floors", "need at least one floor"));
        }
        if !(self.split_scale > 0.0 && self.split_scale <= 1.0) {
            return Err(invalid("split_scale", "must be in (0, 1]"));
        }
        Ok(())
    }

    pub fn room_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.room_width, self.room_height)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().expect("defaults should validate");
    }

    #[test]
    fn partial_file_overrides_only_listed_fields() {
        let config = GameConfig::from_toml_str("token_budget = 14\nmax_floors = 6\n")
            .expect("partial config should parse");
        assert_eq!(config.token_budget, 14);
        assert_eq!(config.max_floors, 6);
        assert_eq!(config.room_width, 750.0);
        assert_eq!(config.door_cooldown_ms, 1000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = GameConfig::from_toml_str("token_budgett = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn oversized_door_is_invalid() {
        let err = GameConfig::from_toml_str("door_width = 900.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "door_width", .. }), "got {err:?}");
    }

    #[test]
    fn entrance_must_place_the_player_clear_of_the_door() {
        let err = GameConfig::from_toml_str("entrance_offset = 25.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "entrance_offset", .. }), "got {err:?}");
        GameConfig::from_toml_str("entrance_offset = 33.0").expect("offset past the door and half a player");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "target_room_count = 9").expect("write config");
        let config = GameConfig::load(file.path()).expect("load config");
        assert_eq!(config.target_room_count, 9);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
