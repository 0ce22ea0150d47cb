//! Title CLI commands.

use clap::{Parser, Subcommand};

/// Title commands.
#[derive(Debug, Parser)]
pub struct TitleCommand {
    #[command(subcommand)]
    pub action: TitleAction,
}

/// Available title actions.
#[derive(Debug, Subcommand)]
pub enum TitleAction {
    /// Show the local title.
    Show {
        /// Refresh from the remote first.
        #[arg(long)]
        refresh: bool,
    },
    /// Refresh the title from the remote.
    Refresh {
        /// Ignore the freshness window.
        #[arg(long)]
        force: bool,
    },
}
