//! Capture sources and the fallback chain that picks between them.

use crate::error::IngestError;
use crate::history::{self, HistoryDialect};
use crate::log_parser;
use crate::retention::{is_log_file, window};
use crate::storage::{is_self_command, CommandRecord};
use crate::transcript;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// A place command records can be recovered from.
///
/// `read` returns at most `n` records, oldest first. An empty result or an
/// error both mean "try the next source".
pub trait CommandSource {
    fn name(&self) -> &'static str;

    fn read(&self, n: usize) -> Result<Vec<CommandRecord>, IngestError>;
}

/// Transcript written by `script(1)`: commands with their real output.
pub struct TranscriptSource {
    path: PathBuf,
}

impl TranscriptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CommandSource for TranscriptSource {
    fn name(&self) -> &'static str {
        "transcript"
    }

    fn read(&self, n: usize) -> Result<Vec<CommandRecord>, IngestError> {
        let bytes = fs::read(&self.path).map_err(|e| IngestError::io(&self.path, e))?;
        let records = transcript::segment(&String::from_utf8_lossy(&bytes));
        Ok(window(records, n))
    }
}

/// How log files are ranked from newest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrder {
    /// File names carry a sortable timestamp prefix.
    #[default]
    Name,
    /// Use the file modification time.
    Modified,
}

/// Directory of per-command log files.
pub struct LogDirSource {
    dir: PathBuf,
    order: LogOrder,
}

impl LogDirSource {
    pub fn new(dir: impl Into<PathBuf>, order: LogOrder) -> Self {
        Self {
            dir: dir.into(),
            order,
        }
    }

    /// Log files in the directory, newest first.
    fn newest_first(&self) -> Result<Vec<PathBuf>, IngestError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| IngestError::io(&self.dir, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_log_file(path))
            .collect();

        match self.order {
            LogOrder::Name => files.sort_by(|a, b| b.file_name().cmp(&a.file_name())),
            LogOrder::Modified => files.sort_by_cached_key(|path| {
                std::cmp::Reverse(
                    fs::metadata(path)
                        .and_then(|m| m.modified())
                        .unwrap_or(SystemTime::UNIX_EPOCH),
                )
            }),
        }
        Ok(files)
    }

    fn parse_usable(path: &Path) -> Option<CommandRecord> {
        let record = match log_parser::parse(path) {
            Ok(record) => record,
            Err(err) => {
                // the shell may be rotating or still writing the file
                debug!(%err, "skipping log file");
                return None;
            }
        };

        if record.command.is_empty() {
            let err = IngestError::MalformedEntry {
                path: path.to_path_buf(),
                reason: "missing COMMAND header".to_string(),
            };
            debug!(%err, "skipping log file");
            return None;
        }
        if is_self_command(&record.command) {
            return None;
        }
        Some(record)
    }
}

impl CommandSource for LogDirSource {
    fn name(&self) -> &'static str {
        "logs"
    }

    fn read(&self, n: usize) -> Result<Vec<CommandRecord>, IngestError> {
        let mut records: Vec<CommandRecord> = self
            .newest_first()?
            .iter()
            .filter_map(|path| Self::parse_usable(path))
            .take(n)
            .collect();

        records.reverse();
        Ok(records)
    }
}

/// Shell history file: command text only, no output.
pub struct HistorySource {
    name: &'static str,
    path: PathBuf,
    dialect: HistoryDialect,
}

impl HistorySource {
    pub fn new(name: &'static str, path: impl Into<PathBuf>, dialect: HistoryDialect) -> Self {
        Self {
            name,
            path: path.into(),
            dialect,
        }
    }

    pub fn zsh(path: impl Into<PathBuf>) -> Self {
        Self::new("zsh history", path, HistoryDialect::Extended)
    }

    pub fn bash(path: impl Into<PathBuf>) -> Self {
        Self::new("bash history", path, HistoryDialect::Plain)
    }
}

impl CommandSource for HistorySource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn read(&self, n: usize) -> Result<Vec<CommandRecord>, IngestError> {
        let commands = history::parse_history(&self.path, self.dialect, n)?;
        Ok(commands.into_iter().map(CommandRecord::command_only).collect())
    }
}

/// Locations of every capture source.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub transcript: PathBuf,
    pub log_dir: PathBuf,
    pub log_order: LogOrder,
    pub zsh_history: PathBuf,
    pub bash_history: PathBuf,
}

/// Tries sources in priority order and returns the first non-empty result.
///
/// Sources are never merged: a transcript with one command hides a log
/// directory with a hundred.
pub struct SourceSelector {
    sources: Vec<Box<dyn CommandSource>>,
}

impl SourceSelector {
    /// Create with specific sources, highest fidelity first.
    pub fn with_sources(sources: Vec<Box<dyn CommandSource>>) -> Self {
        Self { sources }
    }

    /// Standard chain: transcript, structured logs, zsh history, bash history.
    pub fn from_paths(paths: &SourcePaths) -> Self {
        Self::with_sources(vec![
            Box::new(TranscriptSource::new(&paths.transcript)),
            Box::new(LogDirSource::new(&paths.log_dir, paths.log_order)),
            Box::new(HistorySource::zsh(&paths.zsh_history)),
            Box::new(HistorySource::bash(&paths.bash_history)),
        ])
    }

    /// Read the last `n` records from the best available source.
    pub fn read(&self, n: usize) -> Result<Vec<CommandRecord>, IngestError> {
        if n == 0 {
            return Err(IngestError::InvalidArgument(
                "number of commands must be positive".to_string(),
            ));
        }

        let mut attempted = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            attempted.push(source.name());
            match source.read(n) {
                Ok(records) if !records.is_empty() => {
                    debug!(source = source.name(), count = records.len(), "source selected");
                    return Ok(window(records, n));
                }
                Ok(_) => debug!(source = source.name(), "source has no records"),
                Err(err) if err.is_not_found() => {
                    debug!(source = source.name(), %err, "source missing")
                }
                Err(err) => warn!(source = source.name(), %err, "source unreadable"),
            }
        }

        Err(IngestError::NoData { attempted })
    }
}
