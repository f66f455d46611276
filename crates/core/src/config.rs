//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` in the user's
//! config directory, then `GARDEN_FORGE_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::snapshot::{SnapshotManager, DEFAULT_SNAPSHOT_NAME};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "garden-forge";
/// Prefix of environment overrides, e.g. `GARDEN_FORGE_STARTUP_DELAY_MS`.
pub const ENV_PREFIX: &str = "GARDEN_FORGE";

const DEFAULT_CONFIG: &str = r#"# Garden Forge configuration.
# Every key is optional; environment variables prefixed with GARDEN_FORGE_
# override the values below.

# Where the persisted profile, farm stats and quests are stored.
# state_dir = "/home/me/.local/share/garden-forge"

# File name (without extension) of the persisted record.
snapshot_name = "grow-garden-store"

# Set to false to keep everything in memory for the session.
persist = true

# Simulated data loading time before the dashboard appears.
startup_delay_ms = 1000

# Default tracing filter when RUST_LOG is unset.
log_level = "info"
"#;

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the snapshot file.
    pub state_dir: PathBuf,
    /// Snapshot record name.
    pub snapshot_name: String,
    /// Whether to read and write the snapshot at all.
    pub persist: bool,
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Default tracing filter directive.
    pub log_level: String,
    /// Loading screen duration in milliseconds.
    pub startup_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let state_dir = SnapshotManager::default_root();
        Self {
            log_dir: state_dir.join("logs"),
            state_dir,
            snapshot_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            persist: true,
            log_level: "info".to_string(),
            startup_delay_ms: 1_000,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (if it exists) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Loading screen duration.
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Snapshot manager for the configured location, or `None` when persistence is off.
    pub fn snapshot_manager(&self) -> Option<SnapshotManager> {
        self.persist
            .then(|| SnapshotManager::new(&self.state_dir, &self.snapshot_name))
    }
}

/// Location of the user's `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Best-effort startup configuration from the default location.
///
/// Writes the commented default file when missing, then loads the layered
/// configuration. Failures never abort startup: they are handed back to the
/// caller for reporting and the built-in defaults stand in.
pub fn bootstrap() -> (AppConfig, Vec<anyhow::Error>) {
    bootstrap_at(&config_path())
}

fn bootstrap_at(path: &Path) -> (AppConfig, Vec<anyhow::Error>) {
    let mut problems = Vec::new();
    if let Err(err) = write_default_config(path) {
        problems.push(err);
    }
    let config = AppConfig::load_from(path).unwrap_or_else(|err| {
        problems.push(err);
        AppConfig::default()
    });
    (config, problems)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.snapshot_name, DEFAULT_SNAPSHOT_NAME);
        assert_eq!(config.startup_delay(), Duration::from_millis(1_000));
        assert!(config.persist);
        Ok(())
    }

    #[test]
    fn default_file_parses() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.snapshot_name, "grow-garden-store");
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        let state_dir = dir.path().join("state");
        fs::write(
            &path,
            format!(
                "state_dir = {:?}\npersist = false\nstartup_delay_ms = 10\n",
                state_dir.display().to_string()
            ),
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.state_dir, state_dir);
        assert_eq!(config.startup_delay_ms, 10);
        assert!(config.snapshot_manager().is_none());
        Ok(())
    }

    #[test]
    fn unwritable_config_dir_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "regular file")?;

        let (config, problems) = bootstrap_at(&blocker.join("config.toml"));
        assert_eq!(problems.len(), 1);
        assert_eq!(config.snapshot_name, DEFAULT_SNAPSHOT_NAME);
        assert!(config.persist);
        Ok(())
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "startup_delay_ms = \"soon\"\n")?;

        let (config, problems) = bootstrap_at(&path);
        assert_eq!(problems.len(), 1);
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn existing_file_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "startup_delay_ms = 5\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "startup_delay_ms = 5\n");
        Ok(())
    }
}
