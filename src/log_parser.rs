//! Parser for the per-command log files written by the shell integration.
//!
//! A log file is a block of `=== KEY: value` headers, an `=== OUTPUT:` marker,
//! and then the raw command output up to end of file:
//!
//! ```text
//! === COMMAND: cargo build
//! === START_TIME: 2024-05-01 10:00:00
//! === END_TIME: 2024-05-01 10:00:12
//! === DURATION: 12s
//! === EXIT_CODE: 0
//! === WORKING_DIR: /home/me/project
//! === OUTPUT:
//!    Compiling ...
//! ```

use crate::error::IngestError;
use crate::sanitize;
use crate::storage::CommandRecord;
use chrono::{Duration, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::debug;

const HEADER_PREFIX: &str = "=== ";
const OUTPUT_MARKER: &str = "=== OUTPUT:";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read and parse a single log file.
///
/// Only an unreadable file is an error. Missing or unparsable headers leave
/// the corresponding field unset, so a damaged file still yields what it can.
pub fn parse(path: &Path) -> Result<CommandRecord, IngestError> {
    let bytes = fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_str(&content, path))
}

/// Parse log file content; `path` is only used for diagnostics.
pub fn parse_str(content: &str, path: &Path) -> CommandRecord {
    let mut record = CommandRecord::default();
    let mut output_lines: Vec<&str> = Vec::new();
    let mut in_output = false;

    for line in content.lines() {
        if in_output {
            output_lines.push(line);
            continue;
        }

        if line.starts_with(OUTPUT_MARKER) {
            in_output = true;
            continue;
        }

        let Some((key, value)) = line
            .strip_prefix(HEADER_PREFIX)
            .and_then(|header| header.split_once(':'))
        else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "COMMAND" => record.command = value.to_string(),
            "START_TIME" => record.start_time = parse_time(value, key, path),
            "END_TIME" => record.end_time = parse_time(value, key, path),
            "DURATION" => record.duration = parse_duration(value, path),
            "EXIT_CODE" => match value.parse::<i32>() {
                Ok(code) => record.exit_code = Some(code),
                Err(_) => debug!(path = %path.display(), value, "unparsable EXIT_CODE header"),
            },
            "WORKING_DIR" if !value.is_empty() => record.working_dir = Some(value.to_string()),
            _ => {}
        }
    }

    record.output = sanitize::strip(&output_lines.join("\n")).trim().to_string();
    record
}

fn parse_time(value: &str, key: &str, path: &Path) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(value, TIME_FORMAT) {
        Ok(time) => Some(time),
        Err(err) => {
            debug!(path = %path.display(), key, value, %err, "unparsable time header");
            None
        }
    }
}

fn parse_duration(value: &str, path: &Path) -> Option<Duration> {
    let secs = value.strip_suffix('s').unwrap_or(value).trim();
    match secs.parse::<i64>() {
        Ok(secs) => Some(Duration::seconds(secs)),
        Err(_) => {
            debug!(path = %path.display(), value, "unparsable DURATION header");
            None
        }
    }
}
