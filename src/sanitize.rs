use once_cell::sync::Lazy;
use regex::Regex;

/// Lines containing any of these markers are tool chatter, not command output.
const NOISE_MARKERS: &[&str] = &["[bat warning]"];

static CONTROL_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\x1b\[[0-?]*[ -/]*[@-~]",  // CSI (colors, cursor movement, bracketed paste)
        r"|\x1b\][^\x07\x1b]*\x07",  // OSC ending with BEL
        r"|\x1b\][^\x07\x1b]*\x1b\\", // OSC ending with ST
        r"|\x1b[PX^_][^\x1b]*\x1b\\", // DCS, SOS, PM, APC
        r"|\x1b",                     // Stray ESC
    ))
    .unwrap()
});

static CR_BEFORE_LF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r+\n").unwrap());

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Remove terminal control sequences and known noise from captured text.
///
/// Never fails, and `strip(strip(s)) == strip(s)`.
pub fn strip(raw: &str) -> String {
    let text = CONTROL_SEQUENCE.replace_all(raw, "");
    let text = CR_BEFORE_LF.replace_all(&text, "\n").into_owned();

    let text = if NOISE_MARKERS.iter().any(|m| text.contains(m)) {
        text.split('\n')
            .filter(|line| !is_noise(line))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        text
    };

    collapse_blank_lines(&text)
}

/// Squash runs of blank lines down to a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

fn is_noise(line: &str) -> bool {
    NOISE_MARKERS.iter().any(|m| line.contains(m))
}
