use std::path::Path;

use quotebook_core::config::QuotebookConfig;
use quotebook_core::remote::RemoteCollection;
use quotebook_core::sync::{SyncEngine, SyncOutcome};

use crate::commands::common::{build_sync_engine, format_sync_report, open_service};
use crate::error::CliError;

pub async fn run_sync(data_dir: &Path, config: &QuotebookConfig) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let engine = build_sync_engine(service, config)?;

    match engine.run_cycle().await {
        SyncOutcome::Synced(report) => {
            for line in format_sync_report(&report) {
                println!("{line}");
            }
            Ok(())
        }
        SyncOutcome::Failed(_) => Err(CliError::SyncFailed),
        SyncOutcome::Skipped => {
            println!("Sync already in progress");
            Ok(())
        }
    }
}

/// Sync on a fixed interval until Ctrl-C.
pub async fn run_watch(
    interval_secs: Option<u64>,
    immediate: bool,
    data_dir: &Path,
    mut config: QuotebookConfig,
) -> Result<(), CliError> {
    if interval_secs.is_some() {
        config.sync_interval_secs = interval_secs;
    }
    let period = config.sync_interval()?;

    let service = open_service(data_dir)?;
    let engine = build_sync_engine(service, &config)?;
    println!(
        "Syncing with {} every {}s (Ctrl-C to stop)",
        engine.remote().endpoint(),
        period.as_secs()
    );

    watch_until(&engine, period, immediate, shutdown_signal()).await;
    Ok(())
}

pub async fn watch_until<R, F>(
    engine: &SyncEngine<R>,
    period: std::time::Duration,
    immediate: bool,
    shutdown: F,
) where
    R: RemoteCollection,
    F: std::future::Future<Output = ()>,
{
    if immediate {
        if let SyncOutcome::Synced(report) = engine.run_cycle().await {
            tracing::debug!("Initial sync pulled {} quotes", report.pulled);
        }
    }
    engine.run_periodic(period, shutdown).await;
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", error);
        std::future::pending::<()>().await;
    }
}
