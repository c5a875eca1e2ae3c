// Logging module for structured logging using the tracing crate

use std::error::Error;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation systems
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format '{}', expected pretty or json", other)),
        }
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Events go to stderr so
/// command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use trellis::logging::{init_subscriber, LogFormat};
///
/// init_subscriber(LogFormat::Json).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(format: LogFormat) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
}
