use crate::storage::CommandRecord;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const OUTPUT_INDENT: &str = "    ";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `$ command` followed by its output
    #[default]
    Raw,
    /// One fenced code block per command
    Markdown,
    /// Numbered commands with directory and exit code
    Detailed,
}

/// Format records for printing and copying. Never fails.
pub fn render(records: &[CommandRecord], format: OutputFormat) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let num = i + 1;
        match format {
            OutputFormat::Raw => render_raw(&mut out, record),
            OutputFormat::Markdown => render_markdown(&mut out, record, num),
            OutputFormat::Detailed => render_detailed(&mut out, record, num),
        }
    }
    out
}

fn render_raw(out: &mut String, record: &CommandRecord) {
    let _ = writeln!(out, "$ {}", record.command);
    if !record.output.is_empty() {
        let _ = writeln!(out, "{}", record.output);
    }
    out.push('\n');
}

fn render_markdown(out: &mut String, record: &CommandRecord, num: usize) {
    let fence = code_fence(&[record.command.as_str(), record.output.as_str()]);
    let _ = writeln!(out, "### Command {}\n", num);
    let _ = writeln!(out, "{}bash\n$ {}", fence, record.command);
    if !record.output.is_empty() {
        let _ = writeln!(out, "{}", record.output);
    }
    let _ = writeln!(out, "{}\n", fence);
}

/// Backtick fence longer than any backtick run inside the block.
fn code_fence(texts: &[&str]) -> String {
    let longest = texts
        .iter()
        .flat_map(|text| text.split(|c: char| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

fn render_detailed(out: &mut String, record: &CommandRecord, num: usize) {
    let _ = writeln!(out, "Command {}: {}", num, record.command);
    if let Some(dir) = &record.working_dir {
        let _ = writeln!(out, "  Directory: {}", dir);
    }
    if let Some(start) = record.start_time {
        let _ = writeln!(out, "  Started: {}", start.format(TIME_FORMAT));
    }
    if let Some(elapsed) = record.elapsed() {
        let _ = writeln!(out, "  Duration: {}s", elapsed.num_seconds());
    }
    if let Some(code) = record.exit_code.filter(|code| *code != 0) {
        let _ = writeln!(out, "  Exit Code: {}", code);
    }
    if !record.output.is_empty() {
        out.push_str("  Output:\n");
        for line in record.output.lines() {
            let _ = writeln!(out, "{}{}", OUTPUT_INDENT, line);
        }
    }
    out.push('\n');
}
