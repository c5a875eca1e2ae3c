// cache:stats

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use super::load_cache_config;
use crate::cache::{factory, CacheConfig, Storage, StorageStats};

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// Path to the settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the full cache configuration
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub enabled: bool,
    pub storage: String,
    pub available: bool,
    #[serde(flatten)]
    pub contents: StorageStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<CacheConfig>,
}

pub async fn collect(args: &StatsArgs) -> anyhow::Result<StatsReport> {
    let config = load_cache_config(args.config.as_deref())?;
    config.validate()?;

    let backend = factory::create(&config).await?;
    let available = backend.ping().await;
    let contents = backend.stats().await?;

    Ok(StatsReport {
        enabled: config.is_enabled(),
        storage: config.storage_type().to_string(),
        available,
        contents,
        config: args.detailed.then_some(config),
    })
}

pub async fn run<W: Write>(args: &StatsArgs, out: &mut W) -> anyhow::Result<StatsReport> {
    let report = collect(args).await?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_text(&report, out)?;
    }
    Ok(report)
}

fn write_text<W: Write>(report: &StatsReport, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "View cache")?;
    writeln!(out, "  enabled:          {}", report.enabled)?;
    writeln!(out, "  storage:          {} ({})", report.storage, report.contents.backend)?;
    writeln!(out, "  available:        {}", report.available)?;
    writeln!(out, "  entries:          {}", report.contents.entries)?;
    writeln!(out, "  expired entries:  {}", report.contents.expired_entries)?;
    writeln!(out, "  size:             {} bytes", report.contents.size_bytes)?;

    if let Some(config) = &report.config {
        let types = config.view_types();
        writeln!(out, "Configuration")?;
        writeln!(out, "  ttl:              {}s", config.default_ttl())?;
        writeln!(out, "  gc:               {} / {}", config.gc_probability(), config.gc_divisor())?;
        writeln!(
            out,
            "  view types:       html={} markdown={} json={} xml={}",
            types.html, types.markdown, types.json, types.xml
        )?;
        match report.contents.backend.as_str() {
            "redis" => writeln!(
                out,
                "  redis:            {}:{}/{} prefix={}",
                config.redis_host(),
                config.redis_port(),
                config.redis_database(),
                config.redis_prefix()
            )?,
            _ => writeln!(out, "  path:             {}", config.cache_path().display())?,
        }
    }
    Ok(())
}
