//! # Game Configuration
//!
//! Loaded once at startup from an optional TOML file. Every field falls back
//! to the game's built-in constants.
//!
//! ```toml
//! ship_period_ms = 20
//! render_queue_capacity = 512
//! rng_seed = 42
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use invaders_core::constants::{
    ALIEN_BULLET_SPEED, BULLET_SPEED, RAND_SHOOT_CHANCE, SCREEN_PERIOD_MS, SHIP_SPEED,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Tunables for one game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Input task period.
    pub input_period_ms: u64,
    /// Ship task period.
    pub ship_period_ms: u64,
    /// Player bullet task period.
    pub player_bullet_period_ms: u64,
    /// Alien matrix task period.
    pub alien_matrix_period_ms: u64,
    /// Alien bullet task period.
    pub alien_bullet_period_ms: u64,
    /// Screen refresh period.
    pub screen_period_ms: u64,
    /// Stack budget of every task thread, in bytes.
    pub task_stack_size: usize,
    /// Draw commands the render queue holds.
    pub render_queue_capacity: usize,
    /// Pending input commands before new ones are dropped.
    pub input_queue_capacity: usize,
    /// Seed for alien fire. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Each active column fires with probability `1 / shoot_chance` per tick.
    pub shoot_chance: u32,
    /// Ship pixels per tick.
    pub ship_speed: i32,
    /// Player bullet pixels per tick.
    pub bullet_speed: i32,
    /// Alien bullet pixels per tick.
    pub alien_bullet_speed: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            input_period_ms: 10,
            ship_period_ms: 20,
            player_bullet_period_ms: 15,
            alien_matrix_period_ms: 10,
            alien_bullet_period_ms: 20,
            screen_period_ms: SCREEN_PERIOD_MS,
            task_stack_size: 256 * 1024,
            render_queue_capacity: 1024,
            input_queue_capacity: 64,
            rng_seed: None,
            shoot_chance: RAND_SHOOT_CHANCE,
            ship_speed: SHIP_SPEED,
            bullet_speed: BULLET_SPEED,
            alien_bullet_speed: ALIEN_BULLET_SPEED,
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML or unknown keys and `Invalid` for
    /// out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`GameConfig::from_toml_str`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("input_period_ms", self.input_period_ms),
            ("ship_period_ms", self.ship_period_ms),
            ("player_bullet_period_ms", self.player_bullet_period_ms),
            ("alien_matrix_period_ms", self.alien_matrix_period_ms),
            ("alien_bullet_period_ms", self.alien_bullet_period_ms),
            ("screen_period_ms", self.screen_period_ms),
        ];
        if let Some((field, _)) = periods.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Invalid { field: *field, reason: "period must be non-zero" });
        }
        let non_zero = [
            ("render_queue_capacity", self.render_queue_capacity),
            ("input_queue_capacity", self.input_queue_capacity),
            ("task_stack_size", self.task_stack_size),
        ];
        if let Some((field, _)) = non_zero.iter().find(|(_, n)| *n == 0) {
            return Err(ConfigError::Invalid { field: *field, reason: "must be non-zero" });
        }
        if self.shoot_chance == 0 {
            return Err(ConfigError::Invalid { field: "shoot_chance", reason: "must be non-zero" });
        }
        let speeds = [
            ("ship_speed", self.ship_speed),
            ("bullet_speed", self.bullet_speed),
            ("alien_bullet_speed", self.alien_bullet_speed),
        ];
        if let Some((field, _)) = speeds.iter().find(|(_, s)| *s <= 0) {
            return Err(ConfigError::Invalid { field: *field, reason: "speed must be positive" });
        }
        Ok(())
    }

    /// Period of the screen task.
    #[must_use]
    pub const fn screen_period(&self) -> Duration {
        Duration::from_millis(self.screen_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_toml_str("ship_speed = 9\nrng_seed = 7\n").unwrap();
        assert_eq!(config.ship_speed, 9);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.shoot_chance, RAND_SHOOT_CHANCE);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GameConfig::from_toml_str("warp_drive = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_period_rejected() {
        let err = GameConfig::from_toml_str("ship_period_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ship_period_ms", .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load(Some(Path::new("/nonexistent/invaders.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(GameConfig::load(None).unwrap(), GameConfig::default());
    }
}
