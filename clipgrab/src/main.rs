use std::sync::Arc;

use clipgrab::api::ApiServer;
use clipgrab::config::AppConfig;
use clipgrab::downloader::{MediaFetcher, YtDlpFetcher};
use clipgrab::logging::init_logging;
use clipgrab::orchestrator::Orchestrator;
use clipgrab::storage::OutputDir;
use clipgrab::trimmer::{FfmpegTrimmer, MediaTrimmer};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env_or_default();
    let _log_guard = init_logging(config.log_dir.as_deref())?;

    let output_dir = OutputDir::new(&config.output_dir);
    output_dir.ensure_exists().await?;
    info!(dir = %config.output_dir.display(), "Output directory ready");

    let fetcher = Arc::new(YtDlpFetcher::new(&config.ytdlp_path));
    let trimmer = Arc::new(FfmpegTrimmer::new(&config.ffmpeg_path));
    log_tool(fetcher.name(), fetcher.version());
    log_tool(trimmer.name(), trimmer.version());

    let orchestrator = Arc::new(Orchestrator::new(output_dir, fetcher, trimmer));
    let server = ApiServer::new(config.server.clone(), orchestrator);

    tokio::spawn(shutdown_signal(server.cancel_token()));

    info!(version = env!("CARGO_PKG_VERSION"), "clipgrab starting");
    server.run().await?;
    info!("clipgrab stopped");

    Ok(())
}

fn log_tool(name: &str, version: Option<String>) {
    match version {
        Some(version) => info!(tool = name, %version, "External tool available"),
        None => warn!(tool = name, "External tool not found; requests needing it will fail"),
    }
}

/// Cancel `token` on Ctrl+C or SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }

    token.cancel();
}
