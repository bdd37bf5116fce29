//! Client settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::Timeouts;

/// Settings shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The name of the default profile to use.
    pub default_profile: Option<String>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Request timeout in seconds once connected.
    pub read_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts::new(
            self.connect_timeout_secs.map(Duration::from_secs),
            self.read_timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            connect_timeout_secs: Some(10),
            read_timeout_secs: Some(30),
        }
    }
}
