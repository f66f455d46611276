//! Durable snapshot of the persisted slice of game state.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::SnapshotError,
    models::{Achievement, FarmStats, PlayerProfile, Quest},
};

/// Record name used when none is configured.
pub const DEFAULT_SNAPSHOT_NAME: &str = "grow-garden-store";

/// Directory under the user's data dir holding snapshots.
pub const DEFAULT_STATE_DIR: &str = "garden-forge";

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The part of the store that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    /// Player profile, if one was ever set.
    pub profile: Option<PlayerProfile>,
    /// Lifetime farm counters.
    pub farm_stats: FarmStats,
    /// Quests already finished.
    pub completed_quests: Vec<Quest>,
    /// Achievements earned.
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPayload {
    version: u32,
    saved_at: DateTime<Utc>,
    state: PersistedState,
}

/// Reads and writes a single named snapshot record.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    root: PathBuf,
    name: String,
}

impl SnapshotManager {
    /// Create a manager storing `<root>/<name>.json`.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: sanitize_component(&name.into()),
        }
    }

    /// Default location under the user's data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_STATE_DIR)
    }

    /// Full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{}.json", self.name))
    }

    /// Read the snapshot, returning `None` when no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<PersistedState>, SnapshotError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        let payload: SnapshotPayload =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
                path: path.clone(),
                source,
            })?;
        if payload.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: payload.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        debug!(path = %path.display(), saved_at = %payload.saved_at, "Snapshot loaded");
        Ok(Some(payload.state))
    }

    /// Write `state`, replacing any previous snapshot.
    pub fn persist(&self, state: &PersistedState) -> Result<(), SnapshotError> {
        let payload = SnapshotPayload {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        let serialised = serde_json::to_vec_pretty(&payload)?;
        write_file(&self.path(), &serialised)
    }

    /// Remove the snapshot if present.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        let path = self.path();
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| SnapshotError::Io { path, source })
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sanitize_component(input: &str) -> String {
    let result: String = input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect();
    if result.is_empty() {
        DEFAULT_SNAPSHOT_NAME.to_string()
    } else {
        result
    }
}
