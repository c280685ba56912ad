// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use agentsync::config::SyncArgs;

/// Poll a controller for connected agents and stream service changes.
#[derive(Debug, Parser)]
#[command(
    name = "agentsync",
    version,
    long_version = agentsync::version::version_string(),
    about
)]
struct Cli {
    #[command(flatten)]
    args: SyncArgs,
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

    let _ = rustls::crypto::ring::default_provider().install_default();

    if let Err(e) = agentsync::run(cli.args).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
