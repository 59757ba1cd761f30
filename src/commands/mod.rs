pub mod check;
pub mod sync;
pub mod transforms;

use std::path::Path;

use anyhow::{Context, Result};
use polycal_core::PolycalConfig;

/// Load the config from `path`, or from the first config directory found.
pub fn load_config(path: Option<&Path>) -> Result<PolycalConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PolycalConfig::config_path()?,
    };
    tracing::debug!(path = %path.display(), "loading config");
    PolycalConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}
