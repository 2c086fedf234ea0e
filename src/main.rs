// src/main.rs
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use placement_client::cli::{handle_command, Cli};
use placement_client::core::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so table output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    handle_command(cli, config).await
}
