//! Cache maintenance commands
//!
//! Both commands read the same settings as the runtime path and operate on
//! the same backend, so `cache:clear` empties exactly what views populate.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::cache::CacheConfig;
use crate::config::Settings;

pub mod clear;
pub mod stats;

pub use clear::{ClearArgs, ClearOutcome};
pub use stats::{StatsArgs, StatsReport};

/// Settings file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "trellis.yaml";

/// Load the cache configuration from `path`, the default file, or defaults
pub fn load_cache_config(path: Option<&Path>) -> anyhow::Result<CacheConfig> {
    let settings = match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Settings::from_file(&default)
                    .with_context(|| format!("Failed to load configuration from {}", default.display()))?
            } else {
                Settings::default()
            }
        }
    };

    let config = CacheConfig::from_settings(&settings);
    tracing::debug!(
        enabled = config.is_enabled(),
        storage = %config.storage_type(),
        "Cache configuration loaded"
    );
    Ok(config)
}
