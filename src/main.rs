use clap::{Parser, Subcommand};
use std::process::ExitCode;
use trellis::commands::{clear, stats, ClearArgs, StatsArgs};
use trellis::logging::{init_subscriber, LogFormat};

/// Trellis view cache maintenance
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove cached views
    #[command(name = "cache:clear")]
    CacheClear(ClearArgs),

    /// Show what the view cache currently holds
    #[command(name = "cache:stats")]
    CacheStats(StatsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_subscriber(cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut stdout = std::io::stdout();
    let result = match &cli.command {
        Command::CacheClear(args) => clear::run(args, &mut stdout).await.map(|_| ()),
        Command::CacheStats(args) => stats::run(args, &mut stdout).await.map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
