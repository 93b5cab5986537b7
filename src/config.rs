//! Gameplay tuning, optionally overridden from `assets/config.json`.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of a square tile in pixels.
    pub tile_size: i32,
    pub levels_dir: String,
    /// How often the shared reachability index is rebuilt from the player's tile.
    pub reachability_interval_secs: f32,
    pub replan_interval_min_secs: f32,
    pub replan_interval_max_secs: f32,
    /// Side of the square an enemy centre must enter to reach a waypoint.
    pub waypoint_size: i32,
    pub player_speed: f32,
    pub player_max_health: i32,
    pub player_size: i32,
    pub enemy_size: i32,
    pub projectile_size: i32,
    pub pickup_size: i32,
    pub exit_size: i32,
    pub health_pickup_amount: i32,
    /// Fixed seed for reproducible runs. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 50,
            levels_dir: "assets/levels".to_string(),
            reachability_interval_secs: 0.5,
            replan_interval_min_secs: 0.5,
            replan_interval_max_secs: 1.5,
            waypoint_size: 10,
            player_speed: 250.0,
            player_max_health: 100,
            player_size: 30,
            enemy_size: 30,
            projectile_size: 6,
            pickup_size: 24,
            exit_size: 40,
            health_pickup_amount: 25,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text, &display),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: display,
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if self.replan_interval_min_secs <= 0.0
            || self.replan_interval_max_secs < self.replan_interval_min_secs
        {
            return Err(ConfigError::Invalid(
                "replan interval range must be positive and ordered".into(),
            ));
        }
        if self.reachability_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "reachability_interval_secs must be positive".into(),
            ));
        }
        if self.waypoint_size <= 0 || self.waypoint_size > self.tile_size {
            return Err(ConfigError::Invalid(
                "waypoint_size must fit inside a tile".into(),
            ));
        }
        let sizes = [
            ("player_size", self.player_size),
            ("enemy_size", self.enemy_size),
            ("projectile_size", self.projectile_size),
            ("pickup_size", self.pickup_size),
        ];
        for (name, size) in sizes {
            if size <= 0 || size > self.tile_size {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and fit inside a tile, got {size}"
                )));
            }
        }
        Ok(())
    }

    /// Path of the level file for a 1-based level number.
    pub fn level_path(&self, level: u32) -> String {
        format!("{}/{}.txt", self.levels_dir, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "player_speed": 300.0, "rng_seed": 7 }"#, "inline")
            .unwrap();
        assert_eq!(cfg.player_speed, 300.0);
        assert_eq!(cfg.rng_seed, Some(7));
        assert_eq!(cfg.tile_size, 50);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = GameConfig::from_json("{ not json", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn inverted_replan_range_rejected() {
        let err = GameConfig::from_json(
            r#"{ "replan_interval_min_secs": 2.0, "replan_interval_max_secs": 1.0 }"#,
            "inline",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn entity_sizes_must_fit_a_tile() {
        for json in [
            r#"{ "player_size": 0 }"#,
            r#"{ "enemy_size": 51 }"#,
            r#"{ "projectile_size": -6 }"#,
            r#"{ "pickup_size": 24, "tile_size": 20 }"#,
        ] {
            let err = GameConfig::from_json(json, "inline").unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
        }
        let cfg = GameConfig::from_json(r#"{ "enemy_size": 50 }"#, "inline").unwrap();
        assert_eq!(cfg.enemy_size, 50);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = GameConfig::load_or_default("does/not/exist.json").unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn level_paths() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.level_path(1), "assets/levels/1.txt");
        assert_eq!(cfg.level_path(12), "assets/levels/12.txt");
    }
}
