use crate::error::IngestError;
use crate::storage::is_self_command;
use std::fs;
use std::path::Path;

/// Shell history file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDialect {
    /// Bare lines or extended `: <timestamp>:<flags>;<command>` lines (zsh).
    Extended,
    /// One bare command per line (bash).
    Plain,
}

impl HistoryDialect {
    /// Extract the command text of one history line.
    pub fn command_of<'a>(&self, line: &'a str) -> &'a str {
        match self {
            HistoryDialect::Extended if line.starts_with(':') => line
                .split_once(';')
                .map(|(_, command)| command)
                .unwrap_or(line),
            _ => line,
        }
    }
}

/// Read the last `n` commands from a history file, oldest first.
///
/// A missing file is reported as `IoUnavailable` so callers can move on to
/// another history file.
pub fn parse_history(
    path: &Path,
    dialect: HistoryDialect,
    n: usize,
) -> Result<Vec<String>, IngestError> {
    // zsh may store metafied, non UTF-8 bytes
    let bytes = fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_history_str(&content, dialect, n))
}

pub fn parse_history_str(content: &str, dialect: HistoryDialect, n: usize) -> Vec<String> {
    let commands: Vec<String> = content
        .lines()
        .map(|line| dialect.command_of(line).trim())
        .filter(|command| !command.is_empty() && !is_self_command(command))
        .map(str::to_string)
        .collect();

    let start = commands.len().saturating_sub(n);
    commands[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_line() {
        let commands = parse_history_str(": 1690000000:0;git status\n", HistoryDialect::Extended, 5);
        assert_eq!(commands, vec!["git status"]);
    }

    #[test]
    fn test_extended_keeps_semicolons_in_command() {
        let content = ": 1690000000:0;cd src; ls\ncd a; ls\n";
        let commands = parse_history_str(content, HistoryDialect::Extended, 5);
        assert_eq!(commands, vec!["cd src; ls", "cd a; ls"]);
    }

    #[test]
    fn test_plain_dialect_keeps_lines_whole() {
        let content = "ls -la\n: not special;here\n";
        let commands = parse_history_str(content, HistoryDialect::Plain, 5);
        assert_eq!(commands, vec!["ls -la", ": not special;here"]);
    }

    #[test]
    fn test_last_n_in_file_order() {
        let content = "one\ntwo\n\n   \nthree\ncontext last\nfour\n";
        let commands = parse_history_str(content, HistoryDialect::Plain, 2);
        assert_eq!(commands, vec!["three", "four"]);

        let commands = parse_history_str(content, HistoryDialect::Plain, 10);
        assert_eq!(commands, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_history(&dir.path().join(".zsh_history"), HistoryDialect::Extended, 3)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reads_non_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zsh_history");
        fs::write(&path, b": 1:0;echo \xff\n: 2:0;make\n").unwrap();
        let commands = parse_history(&path, HistoryDialect::Extended, 3).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], "make");
    }
}
