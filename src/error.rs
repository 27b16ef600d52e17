//! Error types for PromQL Language Tools

use thiserror::Error;

/// Errors that can occur when using PromQL Language Tools
#[derive(Debug, Error)]
pub enum Error {
    /// The metadata source failed (network, timeout, bad data)
    #[error("Metadata provider failed: {message}")]
    Provider { message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value could not be used
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A regex label matcher did not compile
    #[error("Invalid regex matcher: {0}")]
    InvalidRegex(#[from] regex::Error),
}

impl Error {
    /// Create a metadata provider failure
    #[must_use]
    pub fn provider(err: impl std::fmt::Display) -> Self {
        Self::Provider {
            message: err.to_string(),
        }
    }

    /// Create a configuration error for a named setting
    #[must_use]
    pub fn invalid_config(setting: &str, err: impl std::fmt::Display) -> Self {
        Self::InvalidConfig {
            message: format!("{setting}: {err}"),
        }
    }
}
