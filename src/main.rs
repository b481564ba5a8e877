//! Demo shop server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  DEMO SHOP                    │
//!   load-gen         │  ┌──────────┐   ┌──────────┐   ┌───────────┐ │
//!   ─────────────────┼─▶│ listener │──▶│middleware│──▶│ handlers  │ │
//!                    │  └──────────┘   │ req id   │   │ /login    │ │
//!                    │                 │ trace    │   │ /purchase │ │
//!                    │                 │ timeout  │   │ /user/... │ │
//!                    │                 │ metrics  │   │ /         │ │
//!                    │                 └────┬─────┘   └───────────┘ │
//!                    │                      ▼                        │
//!   prometheus       │               ┌─────────────┐                 │
//!   ◀────────────────┼───────────────│  /metrics   │                 │
//!                    │               └─────────────┘                 │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use demo_shop::config::{self, ConfigError, LogFormat, ShopConfig};
use demo_shop::http::HttpServer;
use demo_shop::lifecycle::Shutdown;
use demo_shop::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "demo-shop")]
#[command(about = "Demo web shop exposing Prometheus metrics", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override purchase.success_rate.
    #[arg(long)]
    success_rate: Option<f64>,

    /// Override observability.log_level.
    #[arg(long)]
    log_level: Option<String>,

    /// Override observability.log_format (pretty or json).
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn resolve_config(&self) -> Result<ShopConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ShopConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(rate) = self.success_rate {
            config.purchase.success_rate = rate;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }

        config::validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init(
        &config.observability.log_level,
        config.observability.log_format,
    )?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "demo-shop starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        success_rate = config.purchase.success_rate,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let handle = if config.observability.metrics_enabled {
        Some(metrics::install()?)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, handle);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
