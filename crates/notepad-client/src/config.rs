//! Remote note service configuration.
//!
//! Loaded from environment variables (a `.env` file is honored by the
//! binary through `dotenvy`):
//!
//! | Variable           | Default                                  |
//! |--------------------|------------------------------------------|
//! | `NOTEHUB_BASE_URL` | `https://notehub-public.goit.study/api`  |
//! | `NOTEHUB_TOKEN`    | (none)                                   |
//! | `NOTEHUB_TIMEOUT`  | `30` (seconds)                           |

use std::env;

use notepad_core::{defaults, Error, Result};
use tracing::debug;

/// Connection settings for [`HttpNoteService`](crate::HttpNoteService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without the `/notes` suffix.
    pub base_url: String,
    /// Bearer token sent with every request (optional).
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            token: None,
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let config = Self {
            base_url: env::var("NOTEHUB_BASE_URL")
                .unwrap_or_else(|_| defaults::API_BASE_URL.to_string()),
            token: env::var("NOTEHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            timeout_seconds: env::var("NOTEHUB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::REQUEST_TIMEOUT_SECS),
        };

        debug!(
            base_url = %config.base_url,
            token_set = config.token.is_some(),
            timeout_seconds = config.timeout_seconds,
            "Loaded note service config"
        );
        config
    }

    /// Point at a different base URL (tests, self-hosted deployments).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(Error::Config("base URL must not be empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base URL must use http or https: {}",
                base
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Full URL of the notes collection.
    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url.trim().trim_end_matches('/'))
    }
}
