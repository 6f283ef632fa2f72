//! Offline-first application shell.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 OFFLINE SHELL                │
//!     Client Request     │  ┌──────────┐    ┌────────────────────────┐  │
//!     ───────────────────┼─▶│   http   │───▶│ disabled endpoints     │  │
//!                        │  │  server  │    │ /api/auth/register     │  │
//!     Client Response    │  │          │◀───│ /api/init-db, /health  │  │
//!     ◀──────────────────┼──│          │    └────────────────────────┘  │
//!                        │  └────┬─────┘                                │
//!                        │       │ mount / unmount                      │
//!                        │       ▼                                      │
//!                        │  ┌──────────┐  delay  ┌─────────┐  start()   │
//!                        │  │ AppShell │────────▶│ trigger │────────────┼──▶ Sync
//!                        │  └──────────┘         └─────────┘            │    Engine
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use offline_shell::config::{load_config, ShellConfig};
use offline_shell::lifecycle::signals::wait_for_shutdown_signal;
use offline_shell::observability::{logging, metrics};
use offline_shell::{engine, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "offline-shell")]
#[command(about = "Offline-first application shell", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ShellConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind.to_string();
    }

    logging::init_logging(&config.observability);

    tracing::info!("offline-shell v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        startup_enabled = config.startup.enabled,
        startup_delay_ms = config.startup.delay_ms,
        engine = config.engine.start_url.as_deref().unwrap_or("local"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let engine = Arc::new(engine::from_config(&config.engine));
    let server = HttpServer::new(config, engine);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_shutdown_signal().await;
            shutdown.trigger();
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
