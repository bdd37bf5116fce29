//! YouTrack profile configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result, TOKEN_ENV};

/// A YouTrack profile configuration.
///
/// Profiles store connection details for a YouTrack instance. The token may
/// live in the file or come from the `YOUTRACK_TOKEN` environment variable,
/// which takes precedence.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// The YouTrack instance URL, e.g. "https://example.com/youtrack".
    pub url: String,

    /// Permanent token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Profile {
    /// Create a new profile.
    pub fn new(name: String, url: String, token: Option<String>) -> Self {
        Self { name, url, token }
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and contains no whitespace
    /// - The URL is non-empty and uses http or https
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL cannot be empty",
                self.name
            )));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        Ok(())
    }

    /// The token to authenticate with.
    ///
    /// A non-empty `YOUTRACK_TOKEN` wins over the token stored in the profile.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if neither is set.
    pub fn resolve_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.token
            .as_ref()
            .filter(|token| !token.trim().is_empty())
            .cloned()
            .ok_or_else(|| ConfigError::MissingToken(self.name.clone()))
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
