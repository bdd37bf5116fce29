//! Centralized error type for the SDK.
//!
//! Each concern has its own `thiserror` enum; [`Error`] aggregates them so a
//! client method can fail with any of them through a single `?`.

use thiserror::Error;

use crate::api::ApiError;
use crate::codec::{DecodeError, EncodeError, MergeError};
use crate::config::ConfigError;
use crate::helpers::NonSingleValueError;
use crate::projection::ProjectionError;

/// The main SDK error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP status, network or header errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The response could not be decoded into the requested type.
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// A request body could not be encoded.
    #[error("{0}")]
    Encode(#[from] EncodeError),

    /// The explicit and non-null views of an entity disagree.
    #[error("{0}")]
    Merge(#[from] MergeError),

    /// No field selector can be computed for the requested type.
    #[error("{0}")]
    Projection(#[from] ProjectionError),

    #[error("{0}")]
    NonSingleValue(#[from] NonSingleValueError),

    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your permanent token.".to_string()
                }
                ApiError::NotFound(url) => format!("'{}' was not found.", url),
                ApiError::UnexpectedStatus { status, .. } if *status >= 500 => {
                    format!("YouTrack server error ({}). Please try again later.", status)
                }
                ApiError::UnexpectedStatus { status, .. } => {
                    format!("YouTrack rejected the request ({}).", status)
                }
                ApiError::EmptyResponse { .. } => {
                    "YouTrack returned an empty response where data was expected.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your network and YouTrack URL.".to_string()
                }
                ApiError::InvalidHeader(_) => {
                    "The token contains characters that cannot be sent.".to_string()
                }
            },
            Error::Decode(e) => format!("Unexpected response from YouTrack: {}", e),
            Error::Encode(e) => format!("Could not encode request: {}", e),
            Error::Merge(e) => format!("Could not encode request: {}", e),
            Error::Projection(e) => format!("Invalid entity type: {}", e),
            Error::NonSingleValue(e) => e.to_string(),
            Error::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
                ConfigError::NoProfile => "No profile selected.".to_string(),
                ConfigError::MissingToken(name) => {
                    format!("No token configured for profile '{}'.", name)
                }
            },
        }
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound(_)))
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::NoConfigDir)
            | Error::Config(ConfigError::NoProfile)
            | Error::Config(ConfigError::ProfileNotFound(_)) => {
                Some("Add a [[profiles]] entry to the configuration file or pass --url.")
            }
            Error::Config(ConfigError::MissingToken(_)) => {
                Some("Set the token in the profile or export YOUTRACK_TOKEN.")
            }
            Error::Api(ApiError::Unauthorized) => {
                Some("Create a permanent token under Profile > Account Security in YouTrack.")
            }
            Error::Api(ApiError::Network(_)) => Some("Check your network connection and YouTrack URL."),
            _ => None,
        }
    }
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
