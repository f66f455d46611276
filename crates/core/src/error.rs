//! Error types raised by the core crate.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted state snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file exists but is not a valid snapshot document.
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The state could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible build.
    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch {
        /// Version recorded in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}
