//! Configuration management for the Canoga engine

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CanogaError;

/// Main configuration for a Canoga session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanogaConfig {
    /// Game configuration
    pub game: GameConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
}

impl Default for CanogaConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            persistence: PersistenceConfig::default(),
        }
    }
}

/// Game-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of squares per row (9, 10 or 11)
    pub board_size: usize,
    /// Fixed RNG seed; omit for OS entropy
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 9,
            rng_seed: None,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Default path used when saving without an explicit target
    pub save_path: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: "canoga-save.txt".to_string(),
        }
    }
}

impl CanogaConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CanogaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CanogaError::Configuration {
                message: format!("Failed to read config file: {}", e),
                field: "config_file".to_string(),
            }
        })?;

        let config: CanogaConfig = toml::from_str(&content).map_err(|e| {
            CanogaError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                field: "config_format".to_string(),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CanogaError> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            CanogaError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                field: "config_serialization".to_string(),
            }
        })?;

        fs::write(path, content).map_err(|e| {
            CanogaError::Configuration {
                message: format!("Failed to write config file: {}", e),
                field: "config_write".to_string(),
            }
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), CanogaError> {
        if !matches!(self.game.board_size, 9 | 10 | 11) {
            return Err(CanogaError::Configuration {
                message: format!(
                    "Board size must be 9, 10 or 11, got {}",
                    self.game.board_size
                ),
                field: "game.board_size".to_string(),
            });
        }

        if self.persistence.save_path.trim().is_empty() {
            return Err(CanogaError::Configuration {
                message: "Save path must not be empty".to_string(),
                field: "persistence.save_path".to_string(),
            });
        }

        Ok(())
    }
}
