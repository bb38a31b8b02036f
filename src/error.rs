//! Error types
//!
//! Only configuration loading and catalog lookups can fail. The simulation
//! itself never errors: illegal moves are no-ops and terminal conditions are
//! lifecycle transitions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A catalog id that names no game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game `{0}`")]
pub struct UnknownGame(pub String);
