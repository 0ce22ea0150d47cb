//! Task CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Task commands.
#[derive(Debug, Parser)]
pub struct TasksCommand {
    #[command(subcommand)]
    pub action: TasksAction,
}

/// Available task actions.
#[derive(Debug, Subcommand)]
pub enum TasksAction {
    /// List local tasks.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Pull tasks from the remote first.
        #[arg(long)]
        refresh: bool,
    },
    /// Add a task.
    Add {
        /// Task title.
        title: String,
        /// Task description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Mark a task as completed.
    Complete {
        /// Task ID.
        id: Uuid,
    },
    /// Mark a completed task as active again.
    Activate {
        /// Task ID.
        id: Uuid,
    },
    /// Delete every completed task.
    ClearCompleted,
    /// Delete every task.
    DeleteAll,
    /// Delete a task.
    Delete {
        /// Task ID.
        id: Uuid,
    },
    /// Refresh tasks from the remote.
    Refresh {
        /// Ignore the freshness window.
        #[arg(long)]
        force: bool,
    },
}
