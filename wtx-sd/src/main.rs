//! wtx-sd (Save Details) - Persistence Service
//!
//! Accepts ticket records over HTTP and stores one document per request.
//! Default listener: 127.0.0.1:5000

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use wtx_common::config::{resolve_database_url, TomlConfig};
use wtx_common::db;
use wtx_sd::{build_router, AppState};

/// Command-line arguments for wtx-sd
#[derive(Parser, Debug)]
#[command(name = "wtx-sd")]
#[command(about = "Persistence service for extracted waste ticket details")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "WTX_SD_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WTX_SD_PORT")]
    port: Option<u16>,

    /// Storage connection string (falls back to WTX_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_source) = TomlConfig::load(args.config.as_deref());

    let level = &config.logging.level;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("wtx_sd={level},wtx_common={level},tower_http={level}").into()
            }),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting WTX Save Details (wtx-sd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let database_url = resolve_database_url(args.database_url.as_deref(), &config);
    let pool = db::init_database(&database_url)
        .await
        .context("Failed to initialize document store")?;
    let stored = db::count_details(&pool).await?;
    info!("✓ Document store ready ({} ticket documents on file)", stored);

    let state = AppState::new(pool);
    let app = build_router(state);

    let host = args.host.unwrap_or(config.persistence.host);
    let port = args.port.unwrap_or(config.persistence.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("wtx-sd listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
