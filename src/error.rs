//! Error taxonomy for reading capture sources.

use std::io;
use std::path::PathBuf;

/// Errors raised while ingesting logs, transcripts and history files.
///
/// On the read path only `NoData` and `InvalidArgument` reach the user; the
/// others are recovered from by skipping a file or trying the next source.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Cannot read {}: {source}", .path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed entry in {}: {reason}", .path.display())]
    MalformedEntry { path: PathBuf, reason: String },

    #[error("No command history found (tried: {})", .attempted.join(", "))]
    NoData { attempted: Vec<&'static str> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IngestError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IoUnavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
