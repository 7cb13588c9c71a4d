//! PhotoBackup daemon
//!
//! Main entry point that wires all crates together and runs the backup
//! services until shutdown.

mod host;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast::error::RecvError, watch};
use tracing_subscriber::{EnvFilter, fmt};

use photobackup_core::config::AppConfig;
use photobackup_core::error::AppError;
use photobackup_core::events::{BackupEvent, EventBus, EventPayload};
use photobackup_core::types::signal::{BackupConnectivity, BackupPermissions};
use photobackup_database::DatabasePool;
use photobackup_database::repositories::{
    SqliteBackupConfigurationRepository, SqliteBackupErrorRepository, SqliteBackupFileRepository,
    SqliteBackupFolderRepository, SqliteDriveFolderRepository,
};
use photobackup_service::{BackupRepositories, BackupServices};
use photobackup_worker::jobs::{BackupNotificationJobHandler, ErrorPruneJobHandler};
use photobackup_worker::{CronScheduler, JobExecutor, JobQueue, WorkerRunner, WorkerScheduler};

use crate::host::StaticBuckets;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PHOTOBACKUP_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PhotoBackup v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    create_data_directory(&config.database.url).await?;

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    photobackup_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Repositories ─────────────────────────────────────
    let repos = BackupRepositories {
        buckets: Arc::new(StaticBuckets::named([
            config.backup.default_bucket_name.clone(),
        ])),
        folders: Arc::new(SqliteBackupFolderRepository::new(&db)),
        files: Arc::new(SqliteBackupFileRepository::new(&db)),
        errors: Arc::new(SqliteBackupErrorRepository::new(&db)),
        configurations: Arc::new(SqliteBackupConfigurationRepository::new(&db)),
        drive_folders: Arc::new(SqliteDriveFolderRepository::new(&db)),
    };

    // ── Step 3: Services ─────────────────────────────────────────
    let events = EventBus::new();
    let job_queue = Arc::new(JobQueue::new());
    let work_scheduler = Arc::new(WorkerScheduler::new(
        Arc::clone(&job_queue),
        &config.worker,
    ));
    let services = BackupServices::new(
        repos.clone(),
        work_scheduler,
        events.clone(),
        &config.backup,
    );

    // Running headless: media access is ours and the link is not metered.
    services.permissions.set(BackupPermissions::Granted);
    services.connectivity.set(BackupConnectivity::Unmetered);

    let restored = services.manager.restore().await?;
    tracing::info!(folders = restored, "Backup folders restored");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Background worker ────────────────────────────────
    let (worker_handle, cron) = if config.worker.enabled {
        tracing::info!("Starting background worker...");

        let mut job_executor = JobExecutor::new();
        job_executor.register(Arc::new(BackupNotificationJobHandler::new(
            services.folders.clone(),
            services.errors.clone(),
            events.clone(),
        )));
        job_executor.register(Arc::new(ErrorPruneJobHandler::new(
            repos.errors.clone(),
            config.backup.error_retention_days,
        )));

        let worker_runner = WorkerRunner::new(
            Arc::clone(&job_queue),
            Arc::new(job_executor),
            config.worker.clone(),
        );

        let cron = CronScheduler::new(Arc::clone(&job_queue)).await?;
        cron.register_default_tasks().await?;
        cron.start().await?;

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            worker_runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        (Some(handle), Some(cron))
    } else {
        tracing::info!("Background worker disabled");
        (None, None)
    };

    // ── Step 5: Event listeners ──────────────────────────────────
    let upload_listener = Arc::clone(&services.upload_errors).listen(&events);
    let report_listener = spawn_problem_reporter(&events);

    tracing::info!("PhotoBackup daemon running");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    if let Some(mut cron) = cron {
        cron.shutdown().await?;
    }
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(Duration::from_secs(30), handle).await;
    }
    upload_listener.abort();
    report_listener.abort();

    db.close().await;
    tracing::info!("PhotoBackup daemon shut down gracefully");
    Ok(())
}

/// Surface backup problem reports in the log
fn spawn_problem_reporter(events: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let EventPayload::Backup(BackupEvent::ProblemReported {
                        folder_id,
                        errors,
                    }) = event.payload
                    {
                        tracing::warn!(folder_id = %folder_id, errors = ?errors, "Backup needs attention");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Problem reporter lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Create the directory holding the database file
async fn create_data_directory(url: &str) -> Result<(), AppError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if path.starts_with(":memory:") {
        return Ok(());
    }

    let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        AppError::internal(format!("Failed to create dir '{}': {}", dir.display(), e))
    })?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
