//! Log CLI commands.

use clap::{Parser, Subcommand};

/// Log commands.
#[derive(Debug, Parser)]
pub struct LogsCommand {
    #[command(subcommand)]
    pub action: LogsAction,
}

/// Available log actions.
#[derive(Debug, Subcommand)]
pub enum LogsAction {
    /// List logs, newest first.
    List,
    /// Record a message.
    Add {
        /// Message to record.
        msg: String,
    },
    /// Remove every log.
    Clear,
}
