//! Authentication handling for the YouTrack API.
//!
//! YouTrack authenticates REST calls with a permanent token sent as a
//! Bearer credential.

use std::fmt;

/// Authentication credentials for YouTrack.
#[derive(Clone)]
pub struct Auth {
    /// The complete "Bearer ..." header value.
    auth_header: String,
}

impl Auth {
    /// Create credentials from a permanent token.
    pub fn new(token: &str) -> Self {
        Self {
            auth_header: format!("Bearer {}", token.trim()),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("auth_header", &"Bearer <redacted>")
            .finish()
    }
}
