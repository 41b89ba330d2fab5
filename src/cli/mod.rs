//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod prompt;

/// missions - track users and their tasks
///
/// Run without a subcommand for the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "missions", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database path (default: ~/.missions/missions.db)
    #[arg(long, global = true, env = "MISSIONS_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except results)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive numbered menu (default)
    Menu,

    /// User management
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Task management
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// User Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Display name
        name: String,

        /// Email address (must be unused)
        email: String,
    },

    /// List all users
    List,

    /// Change a user's name and/or email
    Update {
        /// Current email of the user
        email: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email address
        #[arg(long = "email")]
        new_email: Option<String>,
    },

    /// Delete a user and all of their tasks
    Delete {
        /// Email of the user
        email: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// ============================================================================
// Task Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task for a user
    Add {
        /// Email of the owning user
        email: String,

        /// Task title (max 59 characters)
        title: String,

        /// Task description
        description: String,
    },

    /// List a user's tasks
    List {
        /// Email of the owning user
        email: String,
    },

    /// Delete one of a user's tasks
    Delete {
        /// Email of the owning user
        email: String,

        /// Task ID (see `missions task list`)
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
