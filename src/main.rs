//! Owner Fixer - Entry Point
//!
//! Enforces upload quotas and reconciles file ownership with the directory.
//! Usage: `owner-fixer [config-file]`

use log::{error, info};

use owner_fixer::Server;
use owner_fixer::config::ServiceConfig;
use owner_fixer::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    info!("Launching owner fixer...");

    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::load_from(&path),
        None => ServiceConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };
    server.start().await;
}
