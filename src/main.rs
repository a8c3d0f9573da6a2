mod cli;

use chromecastise::{BatchDriver, BatchOptions, FileOutcome};

use anyhow::{Context, Result};
use ccast_av::{FfmpegEncoder, MediaInfoInspector, ToolRegistry};
use ccast_core::Planner;
use clap::Parser;
use cli::{Cli, LogFormat, LogLevel};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Exit status after an interrupt, as a shell would report SIGINT.
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancelled(&e) => {
            tracing::warn!("Interrupted");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ccast_core::Error>(),
        Some(ccast_core::Error::Cancelled)
    )
}

fn init_logging(cli: &Cli) {
    // Respect RUST_LOG env var if set, otherwise derive from the flags.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        let level = cli
            .log_level
            .unwrap_or(if cli.verbose { LogLevel::Debug } else { LogLevel::Info })
            .as_str();
        format!("chromecastise={level},ccast_core={level},ccast_av={level}")
    });

    match cli.log_format {
        LogFormat::Console => tracing_subscriber::fmt()
            .with_env_filter(&env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(&env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::None => {}
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = chromecastise::load_config_or_default(cli.config.as_deref())?;
    let capabilities = Arc::new(config.capabilities());

    let tools = ToolRegistry::discover(&config.tools);
    for info in tools.check_all() {
        tracing::debug!(
            "{}: available={} version={:?} path={:?}",
            info.name,
            info.available,
            info.version,
            info.path
        );
    }

    let mediainfo = tools.require("mediainfo").context("cannot inspect media")?;
    let inspector = MediaInfoInspector::new(mediainfo.path.clone(), capabilities.clone());

    let ffmpeg_path = match tools.require("ffmpeg") {
        Ok(tool) => tool.path.clone(),
        // Nothing is encoded in a dry run.
        Err(_) if cli.dry_run => PathBuf::from("ffmpeg"),
        Err(e) => return Err(e).context("cannot encode media"),
    };
    let encoder = FfmpegEncoder::new(ffmpeg_path, config.encode.clone());

    let planner = Planner::new(
        &capabilities,
        &config.encode.video_encoder,
        &config.encode.audio_encoder,
    );
    let options = BatchOptions {
        container: cli.container(),
        suffix: cli.suffix.clone(),
        dry_run: cli.dry_run,
    };
    let driver = BatchDriver::new(&inspector, &encoder, planner, options);

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let report = driver.run(&cli.files, &cancel).await?;

    for file in &report.files {
        if let FileOutcome::Planned(plan) = &file.outcome {
            println!(
                "{} -> {} (video: {}, audio: {})",
                file.path.display(),
                plan.output.display(),
                plan.video,
                plan.audio
            );
        }
    }

    for (path, _) in report.failures() {
        tracing::warn!("Not converted: {}", path.display());
    }

    tracing::info!(
        "Done: {} converted, {} skipped, {} planned, {} failed",
        report.converted(),
        report.skipped(),
        report.planned(),
        report.failed()
    );

    Ok(())
}

/// Cancel `cancel` on SIGINT or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => return,
    }

    tracing::info!("Shutdown signal received; stopping");
    cancel.cancel();
}
