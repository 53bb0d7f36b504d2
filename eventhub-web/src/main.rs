//! EventHub Web Server
//!
//! Loads configuration (file, `.env`, `EVENTHUB_*` variables, then flags),
//! refuses to start without key material, and serves the API.

use anyhow::Context;
use clap::Parser;
use eventhub_core::{init_logging, AppConfig};
use eventhub_web::EventHubServerBuilder;
use std::path::PathBuf;
use tracing::info;

/// EventHub Web Server - accounts, bearer tokens and owner-only event management
#[derive(Parser)]
#[command(name = "eventhub-web")]
#[command(about = "HTTP API for EventHub")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Validation happens when the server is built, after logging is up
    let config = AppConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    let mut logging = config.logging.clone();
    if let Some(level) = &args.log_level {
        logging = logging.with_level(level);
    }
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut builder = EventHubServerBuilder::new(config).logging(logging);
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }

    let server = builder.build().context("Failed to build server")?;
    info!("Configuration loaded");

    server.start().await.context("Server failed")?;

    info!("Server shut down");
    Ok(())
}
