// cache:clear

use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use super::load_cache_config;
use crate::cache::{factory, Storage, StorageKind};

#[derive(Args, Debug, Clone, Default)]
pub struct ClearArgs {
    /// Backend to clear instead of the configured one (file or redis)
    #[arg(long = "type", value_name = "TYPE")]
    pub storage: Option<StorageKind>,

    /// Only remove expired entries
    #[arg(long)]
    pub expired: bool,

    /// Clear even when caching is disabled in the configuration
    #[arg(long)]
    pub force: bool,

    /// Path to the settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Every entry was removed
    Cleared,
    /// Only expired entries were removed
    Collected(usize),
    /// Caching is disabled and `--force` was not given
    Skipped,
}

pub async fn run<W: Write>(args: &ClearArgs, out: &mut W) -> anyhow::Result<ClearOutcome> {
    let mut config = load_cache_config(args.config.as_deref())?;

    if !config.is_enabled() && !args.force {
        writeln!(out, "Cache is disabled, nothing to clear (use --force to clear anyway)")?;
        return Ok(ClearOutcome::Skipped);
    }

    if let Some(kind) = args.storage {
        config = config.with_storage(kind);
    }
    config.validate()?;

    let backend = factory::create(&config).await?;

    if args.expired {
        let removed = backend.gc().await?;
        writeln!(out, "Removed {} expired entries from {} cache", removed, backend.name())?;
        tracing::info!(backend = backend.name(), removed, "Expired cache entries removed");
        Ok(ClearOutcome::Collected(removed))
    } else {
        backend.clear().await?;
        writeln!(out, "Cleared {} cache", backend.name())?;
        Ok(ClearOutcome::Cleared)
    }
}
