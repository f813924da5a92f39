//! Cutline CLI entry point.

use anyhow::Result;
use clap::Parser;
use cutline::cli::{commands, Cli, Commands};
use cutline::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging; -v flags win over general.log_level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cutline={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.as_deref(), *port, settings).await?;
        }

        Commands::Ask {
            message,
            timeline,
            media_bin,
            json,
        } => {
            commands::run_ask(
                message,
                timeline.as_deref(),
                media_bin.as_deref(),
                *json,
                settings,
            )
            .await?;
        }

        Commands::Tools { json } => {
            commands::run_tools(*json)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
