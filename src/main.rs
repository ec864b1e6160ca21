//! `ittools-server` binary.
//!
//! Loads the plugin directory, keeps the catalog in step with it and serves
//! the HTTP API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use ittools_server::core::{Config, HttpTransport, ToolServer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = ToolServer::new(config.clone())
        .await
        .context("failed to open tool catalog")?;
    server.start().await.context("failed to load plugins")?;

    // Dropping the watcher stops it.
    let _watcher = server.watch().context("failed to watch plugin directory")?;

    let served = HttpTransport::new(config.http).run(server.clone()).await;

    server.shutdown();
    info!("Stopped");

    served.context("HTTP server failed")
}

/// `level` is the default directive. `RUST_LOG` can refine it per target.
fn init_logging(level: &str, with_timestamps: bool) {
    let default = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
