use crate::render::OutputFormat;
use crate::sources::{LogOrder, SourcePaths};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub retention: RetentionConfig,
    pub display: DisplayConfig,
}

/// Source locations. Unset paths fall back to the shell integration defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SourcesConfig {
    pub transcript: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_order: LogOrder,
    pub zsh_history: Option<PathBuf>,
    pub bash_history: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RetentionConfig {
    pub max_age_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { max_age_days: 7 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub format: OutputFormat,
    // Copy rendered output to the clipboard after printing
    pub copy: bool,
    pub language: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Raw,
            copy: true,
            language: "auto".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path();
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        Self::base_dir().join("config.toml")
    }

    /// `~/.context`, shared with the shell integration scripts.
    pub fn base_dir() -> PathBuf {
        home_dir().join(".context")
    }

    /// Resolve every source location against `home`.
    pub fn source_paths(&self, home: &Path) -> SourcePaths {
        let base = home.join(".context");
        let sources = &self.sources;
        SourcePaths {
            transcript: sources
                .transcript
                .clone()
                .unwrap_or_else(|| base.join("typescript")),
            log_dir: self.log_dir(home),
            log_order: sources.log_order,
            zsh_history: sources
                .zsh_history
                .clone()
                .unwrap_or_else(|| home.join(".zsh_history")),
            bash_history: sources
                .bash_history
                .clone()
                .unwrap_or_else(|| home.join(".bash_history")),
        }
    }

    pub fn log_dir(&self, home: &Path) -> PathBuf {
        self.sources
            .log_dir
            .clone()
            .unwrap_or_else(|| home.join(".context").join("logs"))
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Try to get system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }
}

pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_paths() {
        let paths = Config::default().source_paths(Path::new("/home/me"));
        assert_eq!(paths.transcript, PathBuf::from("/home/me/.context/typescript"));
        assert_eq!(paths.log_dir, PathBuf::from("/home/me/.context/logs"));
        assert_eq!(paths.log_order, LogOrder::Name);
        assert_eq!(paths.zsh_history, PathBuf::from("/home/me/.zsh_history"));
        assert_eq!(paths.bash_history, PathBuf::from("/home/me/.bash_history"));
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[sources]
log_dir = "/var/log/ctx"
log_order = "modified"

[display]
format = "markdown"
copy = false
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let paths = config.source_paths(Path::new("/home/me"));
        assert_eq!(paths.log_dir, PathBuf::from("/var/log/ctx"));
        assert_eq!(paths.log_order, LogOrder::Modified);
        assert_eq!(paths.transcript, PathBuf::from("/home/me/.context/typescript"));
        assert_eq!(config.display.format, OutputFormat::Markdown);
        assert!(!config.display.copy);
        assert_eq!(config.retention.max_age_days, 7);
        assert_eq!(config.display.language, "auto");
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.retention.max_age_days, 7);
        assert_eq!(config.display.format, OutputFormat::Raw);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nformat = \"html\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
