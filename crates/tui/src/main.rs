mod app;

use anyhow::{Context, Result};
use chrono::Utc;
use std::{
    fs::{self, File, OpenOptions},
    path::Path,
    sync::Mutex,
};

use garden_forge_core::{
    config::{self, AppConfig},
    GameStore, NotificationDraft, ProfileUpdate, StoreHandle, CATALOG,
};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

const LOG_FILE: &str = "garden-forge.log";

#[tokio::main]
async fn main() -> Result<()> {
    let (config, mut problems) = config::bootstrap();
    if let Err(err) = init_logging(&config) {
        problems.push(err);
    }
    info!(config = %config::config_path().display(), "Starting Garden Forge");
    for problem in &problems {
        warn!("Startup degraded: {problem:#}");
    }

    let mut store = match config.snapshot_manager() {
        Some(snapshots) => GameStore::hydrate(snapshots),
        None => GameStore::new(),
    };
    store.load_catalog(&CATALOG);
    store.update_profile(ProfileUpdate {
        last_login: Some(Utc::now()),
        ..Default::default()
    });
    for problem in problems {
        store.add_notification(NotificationDraft::new("warning", format!("{problem:#}")));
    }

    let mut app = app::GardenForgeApp::new(StoreHandle::new(store), config);
    app.run().await
}

/// Logs go to a file only; the terminal belongs to the UI.
///
/// The subscriber is installed even when the log file can't be opened; the
/// error is returned so the caller can surface it.
fn init_logging(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, outcome) = match open_log_file(&config.log_dir) {
        Ok(file) => (Some(file), Ok(())),
        Err(err) => (None, Err(err)),
    };
    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .compact()
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    outcome
}

fn open_log_file(log_dir: &Path) -> Result<File> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn log_file_is_created_in_log_dir() -> Result<()> {
        let dir = tempdir()?;
        let log_dir = dir.path().join("logs");
        open_log_file(&log_dir)?;
        assert!(log_dir.join(LOG_FILE).exists());
        Ok(())
    }

    #[test]
    fn log_dir_under_a_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("data");
        fs::write(&blocker, "regular file")?;

        let err = open_log_file(&blocker.join("logs")).err();
        assert!(err.is_some_and(|err| err.to_string().contains("log directory")));
        Ok(())
    }
}
