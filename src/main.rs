//! url-router server
//!
//! Serves a route table over HTTP: every request is resolved against the
//! configured patterns and answered with the winning route.
//!
//! # Architecture Overview
//!
//! ```text
//!     routes.toml ──▶ config ──▶ routing::Router ──▶ ArcSwap ◀── watcher (reload)
//!                                                       │
//!     Client Request ──▶ http::server (axum) ──▶ resolve(path, method)
//!                                                       │
//!     Client Response ◀── 200 JSON / 204 / 404 / 405 ◀──┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use url_router::config::{load_config, ConfigWatcher, RouterConfig};
use url_router::observability::logging;
use url_router::RouteServer;

#[derive(Parser)]
#[command(name = "url-router")]
#[command(about = "Serve a trie-based route table over HTTP", long_about = None)]
struct Args {
    /// Route table (TOML). Without it the table is empty.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the route table when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level)?;
    tracing::info!("url-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        compress = config.routing.compress,
        synthesize_methods = config.routing.synthesize_methods,
        "Configuration loaded"
    );

    // Keep the watcher handle alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let server = RouteServer::new(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, config_updates, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
