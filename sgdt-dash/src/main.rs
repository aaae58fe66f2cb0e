//! sgdt-dash (SMARTGUARD Digital Twin) - engine health dashboard
//!
//! Loads the engine health model once at startup and serves the single-page
//! upload dashboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sgdt_common::classifier::load_classifier;
use sgdt_common::config::{CliOverrides, DashboardConfig};
use sgdt_dash::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for sgdt-dash
#[derive(Parser, Debug)]
#[command(name = "sgdt-dash")]
#[command(about = "SMARTGUARD Digital Twin engine health dashboard")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/sgdt/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Model artifact (JSON, default: models/smartguard_model.json)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Largest accepted upload, in bytes
    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            bind: args.bind,
            port: args.port,
            model_path: args.model,
            log_level: args.log_level,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cli: CliOverrides = args.into();

    let config = DashboardConfig::resolve(&cli).context("Failed to resolve configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "{},tower_http=info",
                    config.log_level
                ))
            }),
        )
        .init();

    info!(
        "Starting SMARTGUARD Digital Twin (sgdt-dash) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using CLI/environment/defaults"),
    }

    let classifier = match load_classifier(&config.model_path) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Failed to load model {}: {}", config.model_path.display(), e);
            return Err(e).context("Failed to load model artifact");
        }
    };

    let state = AppState::new(classifier, config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("sgdt-dash listening on http://{}", addr);
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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
