//! Game tuning
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("life_amount must be at least 1")]
    NoLives,
    #[error("enemy_speed {speed} would step over the defense zone (must be below {limit})")]
    EnemyTooFast { speed: f32, limit: f32 },
}

/// Tuning values for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames per second of the update/render loop
    pub fps: u32,
    pub enemy_speed: f32,
    pub enemy_radius: f32,
    pub arrow_speed: f32,
    pub arrow_radius: f32,
    /// Defense zone radius around the center
    pub attacker_radius: f32,
    pub beak_length: f32,
    /// Drawn size of the aim cursor
    pub aim_size: f32,
    pub life_amount: u32,
    pub spawn_interval_ms: u64,
    pub spawn_start_delay_ms: u64,
    pub spawn_margin: f32,
    /// Fixed RNG seed (a fresh one is picked by the host when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: FPS,
            enemy_speed: ENEMY_SPEED,
            enemy_radius: ENEMY_RADIUS,
            arrow_speed: ARROW_SPEED,
            arrow_radius: ARROW_RADIUS,
            attacker_radius: ATTACKER_RADIUS,
            beak_length: BEAK_LENGTH,
            aim_size: AIM_RADIUS,
            life_amount: LIFE_AMOUNT,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_start_delay_ms: SPAWN_START_DELAY_MS,
            spawn_margin: SPAWN_MARGIN,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("fps", self.fps as f64),
            ("enemy_speed", self.enemy_speed as f64),
            ("enemy_radius", self.enemy_radius as f64),
            ("arrow_speed", self.arrow_speed as f64),
            ("arrow_radius", self.arrow_radius as f64),
            ("attacker_radius", self.attacker_radius as f64),
            ("beak_length", self.beak_length as f64),
            ("aim_size", self.aim_size as f64),
            ("spawn_interval_ms", self.spawn_interval_ms as f64),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.spawn_margin.is_finite() && self.spawn_margin > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "spawn_margin",
                value: self.spawn_margin as f64,
            });
        }
        if self.life_amount == 0 {
            return Err(ConfigError::NoLives);
        }
        // An enemy crosses the breach band in one step at twice the reach
        let limit = 2.0 * (self.attacker_radius + self.enemy_radius);
        if self.enemy_speed >= limit {
            return Err(ConfigError::EnemyTooFast {
                speed: self.enemy_speed,
                limit,
            });
        }
        Ok(())
    }

    /// Period of the update/render task
    pub fn frame_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.fps.max(1) as u64)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn spawn_start_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_start_delay_ms)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "attacker_game_config";

    /// Load config overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
