use crate::error::IngestError;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Keep the last `n` items of a chronologically ordered list.
pub fn window<T>(mut records: Vec<T>, n: usize) -> Vec<T> {
    let start = records.len().saturating_sub(n);
    records.drain(..start);
    records
}

/// Outcome of a retention sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: usize,
    pub failed: usize,
}

/// Delete log files older than `max_age_days`.
///
/// A missing directory counts as already clean. Files that cannot be
/// inspected or removed are logged and skipped.
pub fn purge(log_dir: &Path, max_age_days: u32) -> Result<PurgeReport, IngestError> {
    let max_age = Duration::from_secs(u64::from(max_age_days) * SECONDS_PER_DAY);
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    purge_before(log_dir, cutoff)
}

/// Delete log files last modified strictly before `cutoff`.
pub fn purge_before(log_dir: &Path, cutoff: SystemTime) -> Result<PurgeReport, IngestError> {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %log_dir.display(), "log directory missing, nothing to purge");
            return Ok(PurgeReport::default());
        }
        Err(e) => return Err(IngestError::io(log_dir, e)),
    };

    let mut report = PurgeReport::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %log_dir.display(), %err, "skipping unreadable directory entry");
                report.failed += 1;
                continue;
            }
        };
        let path = entry.path();
        if !is_log_file(&path) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read modification time");
                report.failed += 1;
                continue;
            }
        };
        if modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "purged log file");
                report.removed += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to purge log file");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

pub fn is_log_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;

    fn aged_file(dir: &Path, name: &str, days: u64) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "=== COMMAND: true\n").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(days * SECONDS_PER_DAY);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn test_window_keeps_last_n() {
        assert_eq!(window(vec![1, 2, 3, 4, 5], 2), vec![4, 5]);
        assert_eq!(window(vec![1, 2, 3], 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_short_history_returns_all() {
        assert_eq!(window(vec![1, 2], 10), vec![1, 2]);
        assert_eq!(window(Vec::<i32>::new(), 1), Vec::<i32>::new());
    }

    #[test]
    fn test_window_exact_size_for_all_n() {
        let records: Vec<usize> = (0..20).collect();
        for n in 1..=20 {
            let kept = window(records.clone(), n);
            assert_eq!(kept.len(), n);
            assert!(kept.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(kept.last(), Some(&19));
        }
    }

    #[test]
    fn test_purge_removes_only_expired_logs() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = aged_file(dir.path(), "a.log", 1);
        let old = aged_file(dir.path(), "b.log", 8);
        let ancient = aged_file(dir.path(), "c.log", 30);
        let unrelated = aged_file(dir.path(), "notes.txt", 30);

        let report = purge(dir.path(), 7).unwrap();

        assert_eq!(report, PurgeReport { removed: 2, failed: 0 });
        assert!(fresh.exists());
        assert!(!old.exists());
        assert!(!ancient.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_purge_missing_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let report = purge(&dir.path().join("logs"), 7).unwrap();
        assert_eq!(report, PurgeReport::default());
    }

    #[test]
    fn test_purge_on_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            purge(&file, 7),
            Err(IngestError::IoUnavailable { .. })
        ));
    }
}
