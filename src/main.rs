//! Telefeed main entry point
//!
//! This is the HTTP server binary for the Telegram-to-feed service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use telefeed::config::{load_config, validate, Config};
use telefeed::server::{create_router, shutdown_signal, AppState};
use telefeed::{FeedService, RedisCache, Scraper};
use tracing_subscriber::EnvFilter;

/// Telefeed: Telegram channels as RSS/Atom feeds
///
/// Telefeed scrapes the public web preview of a Telegram channel on demand
/// and serves it as a syndication feed, caching rendered feeds in Redis.
#[derive(Parser, Debug)]
#[command(name = "telefeed")]
#[command(version = "1.0.0")]
#[command(about = "Telegram channels as RSS/Atom feeds", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the Redis URL
    #[arg(long, value_name = "URL")]
    redis_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            config
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(url) = cli.redis_url {
        config.cache.url = url;
    }

    run(config).await
}

/// Builds the service and runs the HTTP server until shutdown
async fn run(config: Config) -> anyhow::Result<()> {
    let scraper = Scraper::new(&config.scraper)?;

    tracing::info!(url = %config.cache.url, "Connecting to Redis");
    let cache = RedisCache::connect(&config.cache.url).await?;

    let service = FeedService::new(
        scraper,
        Arc::new(cache),
        Duration::from_secs(config.cache.write_timeout_secs),
    );

    let state = AppState {
        service: Arc::new(service),
    };

    let router = create_router(state);
    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, "Starting HTTP server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited gracefully");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("telefeed=info,warn"),
            1 => EnvFilter::new("telefeed=debug,info"),
            2 => EnvFilter::new("telefeed=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
