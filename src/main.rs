mod clipboard;
mod config;
mod error;
mod history;
mod i18n;
mod log_parser;
mod render;
mod retention;
mod sanitize;
mod sources;
mod storage;
mod transcript;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::IngestError;
use i18n::I18n;
use render::OutputFormat;
use sources::{SourcePaths, SourceSelector};

#[derive(Parser)]
#[command(name = "context", version)]
#[command(about = "Capture recent terminal commands and their output for sharing")]
struct Cli {
    /// Print debug logs to stderr (overrides CONTEXT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the last N commands with their output and copy them to the clipboard
    Last {
        /// Number of commands [default: 1]
        #[arg(default_value_t = 1)]
        n: usize,
        /// Output format [default: from config, else raw]
        #[arg(long, short, value_enum)]
        format: Option<OutputFormat>,
        /// Print only, don't copy to clipboard
        #[arg(long = "no-copy", short = 'c')]
        no_copy: bool,
    },
    /// Delete per-command log files older than the retention period
    Purge {
        /// Maximum age in days [default: retention.max_age_days]
        #[arg(long)]
        days: Option<u32>,
    },
    /// Print shell integration setup instructions
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new().context("Failed to load configuration")?;
    let i18n = I18n::new(&config.get_effective_language());
    let home = config::home_dir();

    match cli.command {
        Commands::Last { n, format, no_copy } => {
            let paths = config.source_paths(&home);
            let selector = SourceSelector::from_paths(&paths);

            let records = match selector.read(n) {
                Ok(records) => records,
                Err(IngestError::NoData { attempted }) => {
                    eprintln!("{}", i18n.t_format("no_data", &[&attempted.join(", ")]).red().bold());
                    eprintln!("{}", i18n.t("no_data_hint").yellow());
                    std::process::exit(1);
                }
                Err(err) => return Err(err).context(i18n.t("error_read_history")),
            };

            let format = format.unwrap_or(config.display.format);
            let output = render::render(&records, format);
            print!("{}", output);

            if config.display.copy && !no_copy {
                clipboard::copy(&output)
                    .map_err(|e| anyhow!(i18n.t_format("copy_failed", &[&e.to_string()])))?;
                println!("\n{}", i18n.t("copied_to_clipboard").green());
            }
        }
        Commands::Purge { days } => {
            let days = days.unwrap_or(config.retention.max_age_days);
            let report = retention::purge(&config.log_dir(&home), days)
                .context(i18n.t("error_purge"))?;

            println!(
                "{}",
                i18n.t_format("purge_done", &[&report.removed.to_string(), &days.to_string()]).green()
            );
            if report.failed > 0 {
                println!("{}", i18n.t_format("purge_failed", &[&report.failed.to_string()]).yellow());
            }
        }
        Commands::Init => {
            print_init(&i18n, &config.source_paths(&home), &Config::get_config_path());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CONTEXT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_init(i18n: &I18n, paths: &SourcePaths, config_path: &Path) {
    let title = i18n.t("init_title");
    println!("{}", title.bold());
    println!("{}", "=".repeat(title.chars().count().max(24)));
    println!();
    println!("{}", i18n.t("init_intro"));
    println!();
    println!("{}", "Bash (~/.bashrc):".cyan());
    println!("  source /usr/local/share/context/shell/context.bash");
    println!();
    println!("{}", "Zsh (~/.zshrc):".cyan());
    println!("  source /usr/local/share/context/shell/context.zsh");
    println!();
    println!("{}", "Fish (~/.config/fish/config.fish):".cyan());
    println!("  source /usr/local/share/context/shell/context.fish");
    println!();
    println!("{}", i18n.t("init_restart"));
    println!();
    println!("{}", i18n.t("init_sources"));
    println!("  1. {}: {}", i18n.t("init_source_transcript"), paths.transcript.display());
    println!("  2. {}: {}", i18n.t("init_source_logs"), paths.log_dir.display());
    println!(
        "  3. {}: {}, {}",
        i18n.t("init_source_history"),
        paths.zsh_history.display(),
        paths.bash_history.display()
    );
    println!();
    println!("{}", i18n.t_format("init_config", &[&config_path.display().to_string()]).dimmed());
}
