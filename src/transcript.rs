//! Splits a `script(1)` style terminal transcript into command records.
//!
//! The transcript is one long capture of interactive sessions, so command
//! boundaries have to be recovered by spotting shell prompts. Prompts are
//! user configurable, so detection is a list of patterns tried from the most
//! specific to the most general.

use crate::sanitize;
use crate::storage::{is_self_command, CommandRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Header line `script(1)` writes when a capture starts.
const BANNER_PREFIX: &str = "Script ";
/// Confirmations printed by `context last` after copying (en, zh).
const COPY_CONFIRMATIONS: &[&str] = &["Copied to clipboard", "已复制到剪贴板"];

/// A prompt shape and the regex capturing the command typed after it.
pub struct PromptPattern {
    pub name: &'static str,
    regex: Regex,
}

impl PromptPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    /// Text following the prompt marker, if this prompt shape matches.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Prompt shapes in priority order. First accepted match wins.
///
/// Decorated prompts go first: a bare `$`/`%` pattern tried early would cut
/// output lines that merely contain a dollar sign. The `$`/`%` markers must
/// end the first token of the line (or a bracketed `[user@host dir]` prompt).
pub static PROMPT_PATTERNS: Lazy<Vec<PromptPattern>> = Lazy::new(|| {
    vec![
        // ~/src/app ❯ cargo test   (starship, pure, p10k)
        PromptPattern::new("glyph", r"❯\s*(.+)$"),
        // ~/src/app> make
        PromptPattern::new("angle", r"[~/]\S*\s*>\s+(.+)$"),
        // user@host:~$ ls, [user@host dir]$ ls
        PromptPattern::new("dollar", r"^(?:\[[^\]]*\])?\S*\$\s+(.+)$"),
        // host% ls
        PromptPattern::new("percent", r"^(?:\[[^\]]*\])?\S*%\s+(.+)$"),
    ]
});

/// Match `line` against the prompt cascade and return the command it opens.
pub fn detect_command(line: &str) -> Option<&str> {
    for pattern in PROMPT_PATTERNS.iter() {
        let Some(command) = pattern.capture(line).map(str::trim) else {
            continue;
        };
        if is_command_boundary(command) {
            trace!(pattern = pattern.name, command, "prompt matched");
            return Some(command);
        }
    }
    None
}

fn is_command_boundary(command: &str) -> bool {
    command.chars().count() > 1 && !is_self_command(command)
}

/// Record under construction while its output is still being read.
struct OpenRecord {
    command: String,
    output: Vec<String>,
}

impl OpenRecord {
    fn close(self) -> CommandRecord {
        CommandRecord::new(self.command, clean_output(&self.output.join("\n")))
    }
}

/// Segment a raw transcript into records, oldest first.
///
/// Never fails: text without any recognisable prompt yields no records.
pub fn segment(raw: &str) -> Vec<CommandRecord> {
    let text = sanitize::strip(raw);
    let mut records = Vec::new();
    let mut open: Option<OpenRecord> = None;

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with(BANNER_PREFIX) {
            continue;
        }

        if let Some(command) = detect_command(line) {
            if let Some(previous) = open.take() {
                records.push(previous.close());
            }
            open = Some(OpenRecord {
                command: command.to_string(),
                output: Vec::new(),
            });
        } else if let Some(current) = open.as_mut() {
            if !COPY_CONFIRMATIONS.iter().any(|c| line.starts_with(c)) {
                current.output.push(line.to_string());
            }
        }
    }

    if let Some(last) = open {
        records.push(last.close());
    }

    records
}

fn clean_output(output: &str) -> String {
    sanitize::collapse_blank_lines(output.trim())
}
