//! Configuration file support for Respira.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/respira/config.toml`.

use crate::{Error, ExerciseKind, PhaseDurations, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub exercise: ExerciseConfig,

    #[serde(default)]
    pub durations: PhaseDurations,

    #[serde(default)]
    pub sound: SoundConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Exercise selected when a session starts without an explicit choice
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExerciseConfig {
    #[serde(default)]
    pub default: ExerciseKind,
}

/// Audio cue configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("respira")
}

fn default_sound_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from `config_path`, falling back to defaults when
    /// the file does not exist
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("respira").join("config.toml")
    }

    /// Check values that serde cannot constrain
    pub fn validate(&self) -> Result<()> {
        self.durations
            .validate()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Directory holding the session journal
    pub fn journal_dir(&self) -> PathBuf {
        self.data.data_dir.join("journal")
    }
}
