//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Admin portal main binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_portal::{PortalConfig, PortalServer, PORTAL_NAME, PORTAL_VERSION};

#[derive(Parser)]
#[command(name = "admin-portal")]
#[command(about = "Admin panel web application")]
#[command(version = PORTAL_VERSION)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/admin-portal.toml")]
    config: PathBuf,

    /// HTTP host
    #[arg(long)]
    host: Option<String>,

    /// HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Start with an empty identity store
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Starting {} v{}", PORTAL_NAME, PORTAL_VERSION);

    // Load configuration with fallback to defaults
    let mut config = if cli.config.exists() {
        match PortalConfig::from_file(&cli.config) {
            Ok(cfg) => {
                info!("Configuration loaded from: {}", cli.config.display());
                cfg
            }
            Err(e) => {
                error!(
                    "Failed to load configuration from {}: {}",
                    cli.config.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    } else {
        warn!(
            "Configuration file not found: {}. Using defaults.",
            cli.config.display()
        );
        PortalConfig::load(&cli.config)?
    };

    // Override configuration with CLI arguments
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    if cli.no_seed {
        config.seed.enabled = false;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let mut server = PortalServer::new(config);
    server.init().await?;
    server.start().await?;

    info!("Admin portal shutdown completed");
    Ok(())
}
