//! Dynamic router (v1)
//!
//! A reverse proxy whose host → upstream routes are managed at runtime.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────┐
//!                        │               DYNAMIC ROUTER               │
//!     Client Request     │  ┌─────────┐   ┌─────────┐   ┌──────────┐  │
//!     ───────────────────┼─▶│  http   │──▶│ lookup  │──▶│  proxy   │──┼──▶ Upstream
//!                        │  │ server  │   │  (Host) │   │ handler  │  │
//!                        │  └─────────┘   └────┬────┘   └──────────┘  │
//!                        │                     │ read                 │
//!                        │               ┌─────▼──────┐               │
//!                        │               │  routing   │               │
//!                        │               │   table    │               │
//!                        │               └─────▲──────┘               │
//!                        │                     │ add / delete         │
//!     Admin Request      │               ┌─────┴──────┐               │
//!     ───────────────────┼──────────────▶│ admin API  │               │
//!                        │               └────────────┘               │
//!                        └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use dynamic_router::config::{load_config, RouterConfig};
use dynamic_router::lifecycle::startup;
use dynamic_router::observability::logging;

#[derive(Parser)]
#[command(name = "dynamic-router", version)]
#[command(about = "Reverse proxy with runtime-managed host routes", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("dynamic-router v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
