//! Plant CLI commands.

use clap::{Parser, Subcommand};

/// Plant catalog commands.
#[derive(Debug, Parser)]
pub struct PlantsCommand {
    #[command(subcommand)]
    pub action: PlantsAction,
}

/// Available plant actions.
#[derive(Debug, Subcommand)]
pub enum PlantsAction {
    /// List local plants in display order.
    List {
        /// Only plants of this grow zone.
        #[arg(long)]
        zone: Option<i32>,
        /// Refresh from the remote before listing.
        #[arg(long)]
        refresh: bool,
    },
    /// Refresh plants from the remote.
    Refresh {
        /// Only plants of this grow zone.
        #[arg(long)]
        zone: Option<i32>,
        /// Ignore the freshness window.
        #[arg(long)]
        force: bool,
    },
    /// Show one plant, fetching it if missing locally.
    Get {
        /// Plant ID.
        id: String,
        /// Fetch even if a local copy exists.
        #[arg(long)]
        force: bool,
    },
}
