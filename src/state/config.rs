//! Session configuration.
//!
//! Both peers must run with identical configuration; it is not exchanged
//! over the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::win::DEFAULT_WIN_LENGTH;

/// What to do with an anchor message once the board is already anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReanchorPolicy {
    /// Re-initialize the board and discard the game in progress
    #[default]
    Reinitialize,
    /// Keep the current board; the anchor message is inert
    Ignore,
}

/// Game session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stones in a row needed to win.
    pub win_length: usize,

    /// Handling of a second anchor.
    pub reanchor: ReanchorPolicy,

    /// Reject placements at the data layer once a winner is known.
    /// When false, only the input producer stops sending them.
    pub reject_after_finish: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            win_length: DEFAULT_WIN_LENGTH,
            reanchor: ReanchorPolicy::Reinitialize,
            reject_after_finish: false,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the winning run length.
    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    /// Set the re-anchor policy.
    pub fn with_reanchor(mut self, policy: ReanchorPolicy) -> Self {
        self.reanchor = policy;
        self
    }

    /// Reject placements after the game is won.
    pub fn with_reject_after_finish(mut self, reject: bool) -> Self {
        self.reject_after_finish = reject;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_length == 0 {
            return Err(ConfigError::ZeroWinLength);
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "win_length": self.win_length,
            "reanchor": self.reanchor,
            "reject_after_finish": self.reject_after_finish
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("win length must be at least 1")]
    ZeroWinLength,

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.win_length, 3);
        assert_eq!(config.reanchor, ReanchorPolicy::Reinitialize);
        assert!(!config.reject_after_finish);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SessionConfig::from_json(r#"{"win_length": 5}"#).unwrap();
        assert_eq!(
            config,
            SessionConfig::new().with_win_length(5)
        );
    }

    #[test]
    fn test_from_json_full() {
        let config = SessionConfig::from_json(
            r#"{"win_length": 4, "reanchor": "ignore", "reject_after_finish": true}"#,
        )
        .unwrap();
        assert_eq!(config.reanchor, ReanchorPolicy::Ignore);
        assert!(config.reject_after_finish);
        assert_eq!(
            SessionConfig::from_json(&config.to_json().to_string()).unwrap(),
            config
        );
    }

    #[test]
    fn test_from_json_rejects_zero_length() {
        let err = SessionConfig::from_json(r#"{"win_length": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWinLength));
    }

    #[test]
    fn test_from_json_rejects_bad_policy() {
        let err = SessionConfig::from_json(r#"{"reanchor": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
