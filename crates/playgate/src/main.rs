// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use tracing::error;

use playgate::config::GateConfig;

#[derive(Debug, Parser)]
#[command(name = "playgate", version, about = "Time-gated playlist gateway")]
struct Cli {
    #[command(flatten)]
    config: GateConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve playlists over HTTP (default).
    Serve,
    /// Delete expired trial artifacts once and print the report.
    Cleanup,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => playgate::run(cli.config).await,
        Command::Cleanup => cleanup(cli.config).await,
    };
    if let Err(e) = result {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn cleanup(config: GateConfig) -> anyhow::Result<()> {
    let report = playgate::run_cleanup_once(config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_success() {
        anyhow::bail!("{} of {} artifact deletions failed", report.failed, report.expired);
    }
    Ok(())
}
