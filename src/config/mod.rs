//! Configuration management for the `youtrack` CLI.
//!
//! The configuration is a TOML file holding named profiles and settings.
//! The library itself never reads it; clients can be built from a
//! [`Profile`] when a caller chooses to.

mod profile;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use profile::Profile;
pub use settings::Settings;

/// Environment variable that overrides the profile token.
pub const TOKEN_ENV: &str = "YOUTRACK_TOKEN";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    #[error("Failed to create config directory: {0}")]
    CreateDirError(std::io::Error),

    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("No profile selected and no default profile configured")]
    NoProfile,

    #[error("No token for profile '{0}'")]
    MissingToken(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// `<config dir>/youtrack-sdk`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("youtrack-sdk"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the configuration from its default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load and validate the configuration at `path`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), profiles = config.profiles.len(), "Loaded configuration");
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate every profile, name uniqueness and the default profile.
    pub fn validate(&self) -> Result<()> {
        for (index, profile) in self.profiles.iter().enumerate() {
            profile.validate()?;
            if self.profiles[..index].iter().any(|p| p.name == profile.name) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(default) = &self.settings.default_profile {
            if !self.profiles.iter().any(|p| &p.name == default) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' does not exist",
                    default
                )));
            }
        }

        Ok(())
    }

    /// Select a profile by name, falling back to the default profile and
    /// then to the only profile.
    pub fn profile(&self, name: Option<&str>) -> Result<&Profile> {
        let name = name.or(self.settings.default_profile.as_deref());
        match name {
            Some(name) => self
                .profiles
                .iter()
                .find(|p| p.name == name)
                .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string())),
            None => match self.profiles.as_slice() {
                [only] => Ok(only),
                _ => Err(ConfigError::NoProfile),
            },
        }
    }
}
