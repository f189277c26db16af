//! MergeService: orchestrates sources, applies merge policy, deserializes to EntitreeConfig.

use crate::config::sources::{environment, global_file};
use crate::config::EntitreeConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;
use tracing::debug;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file ->
    /// `ENTITREE__*` environment -> `ENTITREE_API_URL` (highest).
    pub fn load(explicit_file: Option<&Path>) -> Result<EntitreeConfig, ApiError> {
        let builder = policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit_file {
            Some(path) => {
                debug!(path = %path.display(), "Loading explicit config file");
                builder.add_source(File::from(path).required(true))
            }
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;
        let builder = policy::apply_legacy_overrides(builder)?;

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
