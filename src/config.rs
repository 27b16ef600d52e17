//! Completion options
//!
//! Options can be built in code, deserialized from JSON, or read from the
//! environment.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`CompletionOptions::history_limit`]
pub const HISTORY_LIMIT_ENV: &str = "PROMQL_COMPLETION_HISTORY_LIMIT";

/// Default number of history entries offered for an empty query
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Options controlling completion generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionOptions {
    /// Maximum number of history entries offered for an empty query
    pub history_limit: usize,
    /// Escape `\` and `"` in inserted label values
    pub escape_label_values: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            escape_label_values: true,
        }
    }
}

impl CompletionOptions {
    /// Create options with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default options with environment overrides applied
    pub fn from_env() -> Result<Self, Error> {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of these options
    pub fn with_env_overrides(self) -> Result<Self, Error> {
        self.with_overrides(std::env::var(HISTORY_LIMIT_ENV).ok().as_deref())
    }

    fn with_overrides(mut self, history_limit: Option<&str>) -> Result<Self, Error> {
        if let Some(raw) = history_limit {
            self.history_limit = raw
                .trim()
                .parse()
                .map_err(|e| Error::invalid_config(HISTORY_LIMIT_ENV, e))?;
            log::debug!("History limit set to {} via {HISTORY_LIMIT_ENV}", self.history_limit);
        }
        Ok(self)
    }

    /// Builder method to set the history limit
    #[must_use]
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Builder method to toggle label value escaping
    #[must_use]
    pub fn escape_label_values(mut self, escape: bool) -> Self {
        self.escape_label_values = escape;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompletionOptions::new();
        assert_eq!(options.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(options.escape_label_values);
    }

    #[test]
    fn test_from_json_partial() {
        let options = CompletionOptions::from_json(r#"{"historyLimit": 5}"#).unwrap();
        assert_eq!(options.history_limit, 5);
        assert!(options.escape_label_values);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = CompletionOptions::from_json(r#"{"historyLimit": "many"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_override_history_limit() {
        let options = CompletionOptions::new().with_overrides(Some(" 3 ")).unwrap();
        assert_eq!(options.history_limit, 3);

        let unchanged = CompletionOptions::new().with_overrides(None).unwrap();
        assert_eq!(unchanged, CompletionOptions::default());
    }

    #[test]
    fn test_override_rejects_garbage() {
        let err = CompletionOptions::new()
            .with_overrides(Some("lots"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains(HISTORY_LIMIT_ENV));
    }

    #[test]
    fn test_builder() {
        let options = CompletionOptions::new()
            .history_limit(0)
            .escape_label_values(false);
        assert_eq!(options.history_limit, 0);
        assert!(!options.escape_label_values);
    }
}
