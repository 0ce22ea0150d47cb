//! CLI command definitions.

pub mod logs;
pub mod plants;
pub mod tasks;
pub mod title;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Local-first cache over a remote record service.
#[derive(Debug, Parser)]
#[command(name = "freshcache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Remote base URL.
    #[arg(long, env = "REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Path to the SQLite database.
    #[arg(long, env = "SQLITE_PATH")]
    pub db: Option<PathBuf>,

    /// Keep records in memory only.
    #[arg(long)]
    pub in_memory: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plant catalog.
    Plants(plants::PlantsCommand),
    /// Current title.
    Title(title::TitleCommand),
    /// To-do tasks.
    Tasks(tasks::TasksCommand),
    /// Local application log.
    Logs(logs::LogsCommand),
}
