//! Copy text to the system clipboard through the platform's CLI tools.

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard tool available. On Linux, install wl-clipboard, xclip or xsel.")]
    NoToolAvailable,

    #[error("Clipboard tool '{tool}' failed: {message}")]
    ToolFailed { tool: &'static str, message: String },

    #[error("Platform not supported")]
    UnsupportedPlatform,
}

/// An external program that reads clipboard text from stdin.
#[derive(Debug, Clone, Copy)]
pub struct CopyTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl CopyTool {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let failed = |message: String| ClipboardError::ToolFailed {
            tool: self.program,
            message,
        };

        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }

        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(failed(format!("exited with {}", status)))
        }
    }
}

/// Clipboard tools for this platform in priority order.
pub fn platform_tools() -> Vec<CopyTool> {
    if cfg!(target_os = "macos") {
        vec![CopyTool::new("pbcopy", &[])]
    } else if cfg!(target_os = "windows") {
        vec![CopyTool::new("clip", &[])]
    } else if cfg!(unix) {
        vec![
            CopyTool::new("wl-copy", &[]),
            CopyTool::new("xclip", &["-selection", "clipboard"]),
            CopyTool::new("xsel", &["--clipboard", "--input"]),
        ]
    } else {
        Vec::new()
    }
}

/// Copy `text` with the first tool that works.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    copy_with(&platform_tools(), text)
}

pub fn copy_with(tools: &[CopyTool], text: &str) -> Result<(), ClipboardError> {
    if tools.is_empty() {
        return Err(ClipboardError::UnsupportedPlatform);
    }

    for tool in tools {
        match tool.copy(text) {
            Ok(()) => {
                debug!(tool = tool.program, bytes = text.len(), "copied to clipboard");
                return Ok(());
            }
            Err(err) => debug!(%err, "clipboard tool unavailable"),
        }
    }

    Err(ClipboardError::NoToolAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tools_is_unsupported() {
        assert!(matches!(
            copy_with(&[], "x"),
            Err(ClipboardError::UnsupportedPlatform)
        ));
    }

    #[test]
    fn test_missing_tools_report_no_tool() {
        let tools = [CopyTool::new("context-test-no-such-clipboard-tool", &[])];
        assert!(matches!(
            copy_with(&tools, "x"),
            Err(ClipboardError::NoToolAvailable)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_working_tool_wins() {
        let tools = [
            CopyTool::new("context-test-no-such-clipboard-tool", &[]),
            CopyTool::new("cat", &[]),
        ];
        assert!(copy_with(&tools, "hello").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_skipped() {
        let tools = [CopyTool::new("false", &[])];
        assert!(matches!(
            copy_with(&tools, "x"),
            Err(ClipboardError::NoToolAvailable)
        ));
    }
}
