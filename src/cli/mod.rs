//! Command-line interface for tsk
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

mod session;
mod task;

/// tsk - personal task list
///
/// Create, list, filter, complete, and delete tasks. Storage is a local
/// per-owner file or a hosted backend, selected by configuration.
#[derive(Parser, Debug)]
#[command(name = "tsk")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Owner identity (overrides the signed-in session)
    #[arg(long, global = true, env = "TSK_OWNER")]
    pub owner: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true, env = "TSK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title (required, must not be empty)
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: low, medium, high
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Due date (RFC 3339, e.g. "2026-09-01T12:00:00Z")
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, optionally filtered
    List {
        /// Free-text filter on title and description
        #[arg(short = 'f', long, default_value = "")]
        query: String,

        /// Status filter: all, active, completed
        #[arg(short, long, default_value = "all")]
        status: String,

        /// Priority filter: all, low, medium, high
        #[arg(short, long, default_value = "all")]
        priority: String,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Mark a task completed (alias for toggle on an active task)
    Done {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id (or unique id prefix)
        id: String,
    },

    /// Sign in as an owner
    Login {
        /// Owner identity to persist
        owner: String,
    },

    /// Sign out and clear the session
    Logout,

    /// Show the signed-in owner
    Whoami,

    /// Open the interactive task list
    Ui,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let options = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                due,
            } => task::run_add(task::AddOptions {
                title,
                description,
                priority,
                due,
                owner: self.owner,
                config,
                options,
            }),
            Commands::List {
                query,
                status,
                priority,
            } => task::run_list(task::ListOptions {
                query,
                status,
                priority,
                owner: self.owner,
                config,
                options,
            }),
            Commands::Toggle { id } => task::run_toggle(&id, self.owner, config, options),
            Commands::Done { id } => task::run_done(&id, self.owner, config, options),
            Commands::Rm { id } => task::run_rm(&id, self.owner, config, options),
            Commands::Login { owner } => session::run_login(&owner, config, options),
            Commands::Logout => session::run_logout(config, options),
            Commands::Whoami => session::run_whoami(self.owner.as_deref(), config, options),
            Commands::Ui => crate::ui::run(self.owner, config),
        }
    }
}
