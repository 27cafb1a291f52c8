//! Status Light CLI
//!
//! Command-line interface for the uptime status indicator service.

use std::path::PathBuf;

use clap::Parser;
use statuslight::{load_config, Config, Exit};
use tracing::Level;

#[derive(Parser)]
#[command(name = "statuslight")]
#[command(about = "Uptime status indicator service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Admin interface port (overrides config file)
    #[arg(long)]
    admin_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, admin_port={:?}, log_level={:?}",
        args.config,
        args.admin_port,
        args.log_level
    );

    loop {
        let config = load(&args)?;

        tracing::info!("Starting status light service");
        tracing::debug!(
            "Endpoints: {}, poll interval: {}s",
            config.endpoints.len(),
            config.poll_interval_seconds
        );

        match statuslight::run(config, Some(args.config.clone())).await? {
            Exit::Restart => tracing::info!("Restarting status light service"),
            Exit::Shutdown => break,
        }
    }

    Ok(())
}

/// Read the config file, or fall back to defaults, then apply CLI overrides
fn load(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        tracing::debug!("Loading configuration from {:?}", args.config);
        load_config(&args.config)?
    } else {
        tracing::warn!(
            "No configuration found at {:?}, using defaults",
            args.config
        );
        Config::default()
    };

    if let Some(admin_port) = args.admin_port {
        config.admin.port = admin_port;
    }

    Ok(config)
}
