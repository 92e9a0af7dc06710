//! Game configuration loaded from TOML.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// How the outcome is established when a saved game is restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Re-run win and draw detection on the restored board.
    #[default]
    Recompute,
    /// Always start as in progress; a finished board then rejects every
    /// move as occupied until reset.
    AssumeInProgress,
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Path of the JSON state file used by the file store.
    storage_path: PathBuf,

    /// Storage key for the board entry.
    board_key: String,

    /// Storage key for the turn entry.
    turn_key: String,

    /// Outcome handling on restore.
    restore_policy: RestorePolicy,

    /// Whether a win triggers the celebration.
    celebrate: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("tictactoe_state.json"),
            board_key: "board".to_string(),
            turn_key: "turn".to_string(),
            restore_policy: RestorePolicy::default(),
            celebrate: true,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(storage_path = %config.storage_path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Replaces the state file path.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}
