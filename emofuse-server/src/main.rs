//! emofuse-server - Multimodal emotion fusion service
//!
//! Fuses face, voice and text emotion signals into one label per request.
//! Optionally runs a camera loop that keeps a live visual label current.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use emofuse_common::config::TomlConfig;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emofuse_server::bootstrap::bootstrap;
use emofuse_server::config::{apply_overrides, listen_addr, CliOverrides};

/// Command-line arguments for emofuse-server
#[derive(Parser, Debug)]
#[command(name = "emofuse-server")]
#[command(about = "Multimodal emotion fusion service")]
#[command(version)]
struct Args {
    /// TOML config file (default: platform config dir)
    #[arg(short, long, env = "EMOFUSE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "EMOFUSE_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EMOFUSE_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "EMOFUSE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Camera still-image URL; enables streaming mode
    #[arg(long, env = "EMOFUSE_CAMERA_URL")]
    camera_url: Option<String>,

    /// Face emotion detector base URL
    #[arg(long, env = "EMOFUSE_DETECTOR_URL")]
    detector_url: Option<String>,

    /// Translation service base URL
    #[arg(long, env = "EMOFUSE_TRANSLATOR_URL")]
    translator_url: Option<String>,

    /// ffmpeg executable for WebM transcoding
    #[arg(long, env = "EMOFUSE_FFMPEG")]
    ffmpeg: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind: self.bind.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            snapshot_url: self.camera_url.clone(),
            face_detector_url: self.detector_url.clone(),
            translator_url: self.translator_url.clone(),
            ffmpeg_path: self.ffmpeg.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before the subscriber exists so its level can seed the
    // filter; a load warning emitted here is therefore not printed.
    let file_config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let config = apply_overrides(file_config, &args.overrides());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "emofuse_server={level},emofuse_common={level},tower_http=info",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting emofuse-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let boot = bootstrap(&config).context("Failed to initialize services")?;
    let app = emofuse_server::build_router(boot.state);

    let cancel = CancellationToken::new();
    let stream_task = boot
        .stream
        .map(|stream| tokio::spawn(stream.run(cancel.clone())));

    let addr = listen_addr(&config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    cancel.cancel();
    if let Some(task) = stream_task {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Visual stream task ended abnormally");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
