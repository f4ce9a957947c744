use chrono::{Duration, NaiveDateTime};

/// Name of this tool. Commands starting with it are never reported back,
/// so `context last` does not capture its own invocations.
pub const TOOL_NAME: &str = "context";

/// One executed shell command as recovered from a capture source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandRecord {
    pub command: String,                  // Command line, trimmed, without prompt decoration
    pub output: String,                   // Sanitized stdout/stderr, may be empty
    pub start_time: Option<NaiveDateTime>, // Only structured logs carry timestamps
    pub end_time: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub exit_code: Option<i32>,           // None means unknown, not failure
    pub working_dir: Option<String>,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: output.into(),
            ..Self::default()
        }
    }

    /// Record recovered from shell history: command text only.
    pub fn command_only(command: impl Into<String>) -> Self {
        Self::new(command, String::new())
    }

    /// Run time, from the logged duration or else the start/end timestamps.
    pub fn elapsed(&self) -> Option<Duration> {
        self.duration.or_else(|| match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        })
    }
}

pub fn is_self_command(command: &str) -> bool {
    command.trim_start().starts_with(TOOL_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_command_detection() {
        assert!(is_self_command("context last 3"));
        assert!(is_self_command("  context"));
        assert!(!is_self_command("echo context"));
        assert!(!is_self_command("ls"));
    }

    #[test]
    fn test_elapsed_falls_back_to_timestamps() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut record = CommandRecord {
            start_time: Some(start),
            end_time: Some(start + Duration::seconds(5)),
            ..CommandRecord::new("sleep 5", "")
        };
        assert_eq!(record.elapsed(), Some(Duration::seconds(5)));

        record.duration = Some(Duration::seconds(6));
        assert_eq!(record.elapsed(), Some(Duration::seconds(6)));

        assert_eq!(CommandRecord::new("ls", "").elapsed(), None);
    }

    #[test]
    fn test_command_only_has_no_metadata() {
        let record = CommandRecord::command_only("git status");
        assert_eq!(record.command, "git status");
        assert!(record.output.is_empty());
        assert_eq!(record.exit_code, None);
        assert_eq!(record.start_time, None);
    }
}
