//! wtx-xp (Extraction Proxy)
//!
//! Forwards `<prefix>/*` to the extraction upstream with the prefix removed.
//! Default listener: 127.0.0.1:5173

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use wtx_common::config::TomlConfig;
use wtx_xp::{build_router, AppState, ProxyRule};

/// Command-line arguments for wtx-xp
#[derive(Parser, Debug)]
#[command(name = "wtx-xp")]
#[command(about = "Reverse proxy to the ticket extraction API")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "WTX_XP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "WTX_XP_PORT")]
    port: Option<u16>,

    /// Path prefix to strip before forwarding
    #[arg(long, env = "WTX_PROXY_PREFIX")]
    prefix: Option<String>,

    /// Origin to forward to
    #[arg(short, long, env = "WTX_UPSTREAM_ORIGIN")]
    upstream_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_source) = TomlConfig::load(args.config.as_deref());

    let level = &config.logging.level;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("wtx_xp={level},wtx_common={level},tower_http={level}").into()
            }),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting WTX Extraction Proxy (wtx-xp) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let proxy = config.proxy;
    let prefix = args.prefix.unwrap_or(proxy.prefix);
    let upstream_origin = args.upstream_origin.unwrap_or(proxy.upstream_origin);

    let rule = ProxyRule::new(&prefix, &upstream_origin).context("Invalid proxy configuration")?;
    info!("Forwarding {}/* -> {}/*", rule.prefix(), rule.origin());

    let state = AppState::new(rule).context("Failed to build HTTP client")?;
    let app = build_router(state);

    let host = args.host.unwrap_or(proxy.host);
    let port = args.port.unwrap_or(proxy.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("wtx-xp listening on http://{}", addr);
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
