//! a11y-eval CLI tool.
//!
//! Usage:
//! ```bash
//! a11y-eval evaluate [OPTIONS] [PATH]
//! a11y-eval list-rules
//! a11y-eval init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Accessibility evaluator for DOM snapshots of web pages
#[derive(Parser)]
#[command(name = "a11y-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate snapshot files
    Evaluate {
        /// Snapshot JSON file, or a directory searched for `*.json` files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated ids or patterns, e.g. `LINK_*`)
        #[arg(long)]
        rules: Option<String>,

        /// Declarative ruleset file that selects and orders rules
        #[arg(long)]
        ruleset: Option<PathBuf>,

        /// Page title (default: the document's `<title>`)
        #[arg(long)]
        title: Option<String>,

        /// Page URL (default: the snapshot path)
        #[arg(long)]
        url: Option<String>,

        /// Include passed and hidden results in the output
        #[arg(long)]
        include_passed: bool,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for evaluation results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-result compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Evaluate {
            path,
            format,
            rules,
            ruleset,
            title,
            url,
            include_passed,
        } => {
            let source = config_resolver::resolve(project_dir(&path), cli.config.as_deref());
            let options = commands::evaluate::Options {
                format,
                rules,
                ruleset,
                title,
                url,
                include_passed,
            };
            let failed = commands::evaluate::run(&path, &options, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            commands::list_rules::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

/// Directory the project config search starts from: the path itself when
/// it is a directory, else its parent.
fn project_dir(path: &Path) -> &Path {
    if path.is_dir() {
        return path;
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
