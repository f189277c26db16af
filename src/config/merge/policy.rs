//! Defaults and final overrides applied around the file/env sources.

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::search::DEFAULT_DEBOUNCE_MS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Single-variable override for the base URL, applied above every other source.
pub const LEGACY_BASE_URL_ENV: &str = "ENTITREE_API_URL";

/// Builder seeded with built-in defaults (lowest precedence).
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("search.debounce_ms", DEFAULT_DEBOUNCE_MS)
}

/// Apply `ENTITREE_API_URL` when set and non-empty.
pub fn apply_legacy_overrides(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let base_url = std::env::var(LEGACY_BASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    builder.set_override_option("api.base_url", base_url)
}
