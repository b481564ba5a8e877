use clap::Parser;

use demo_shop::config::LogFormat;
use demo_shop::lifecycle::Shutdown;
use demo_shop::loadgen::{LoadConfig, LoadGenerator};
use demo_shop::observability::logging;

#[derive(Parser)]
#[command(name = "load-gen")]
#[command(about = "Sends random traffic to the demo shop", long_about = None)]
struct Cli {
    /// Base URL of a shop replica. Repeat to spread traffic across several.
    #[arg(short, long = "target", default_value = "http://localhost:8000")]
    targets: Vec<String>,

    /// Shortest pause between requests.
    #[arg(long, default_value_t = 100)]
    min_delay_ms: u64,

    /// Longest pause between requests.
    #[arg(long, default_value_t = 1000)]
    max_delay_ms: u64,

    /// Per-request timeout.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Stop after this many requests (runs forever by default).
    #[arg(long)]
    max_requests: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value = "json")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    let generator = LoadGenerator::new(LoadConfig {
        targets: cli.targets,
        min_delay_ms: cli.min_delay_ms,
        max_delay_ms: cli.max_delay_ms,
        timeout_secs: cli.timeout_secs,
        max_requests: cli.max_requests,
    })?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    generator.run(shutdown.subscribe()).await;
    Ok(())
}
