//! Error types for the entity tree browser.

use thiserror::Error;

/// Errors surfaced at module seams (config, terminal, preferences, CLI).
///
/// Fetch failures never leave the client as an `ApiError`; they are folded
/// into [`crate::client::FetchOutcome::Failed`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("No node found for path '{0}'")]
    NotFound(String),

    #[error("Failed to fetch '{path}': {reason}")]
    FetchFailed { path: String, reason: String },

    #[error("Refusing to act on '{resolved}': nothing exists at '{requested}'")]
    FallbackRefused { requested: String, resolved: String },
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}
