//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// AVV Tracker - kanban pipeline for pre-sales opportunities
#[derive(Parser, Debug)]
#[command(name = "avv", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.avv-tracker/data/avv.db)
    #[arg(long, global = true, env = "AVV_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and apply the schema
    Init {
        /// Overwrite an existing database
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Create a new opportunity
    Add(AddArgs),

    /// List opportunities
    List(ListArgs),

    /// Show one opportunity with comments and attachments
    Show {
        /// Opportunity ID
        id: String,
    },

    /// Update tracked fields of an opportunity
    Update(UpdateArgs),

    /// Move an opportunity to another pipeline status
    Move {
        /// Opportunity ID
        id: String,

        /// Target status (reception, analyse, proposition, validation,
        /// cloture_gagne, cloture_perdu; synonyms like won/lost work)
        status: String,
    },

    /// Delete an opportunity (refused in validation or closed states)
    Delete {
        /// Opportunity ID
        id: String,
    },

    /// Comments on an opportunity
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// File attachments on an opportunity
    Attach {
        #[command(subcommand)]
        command: AttachCommands,
    },

    /// Show the change history of an opportunity
    History {
        /// Opportunity ID
        id: String,

        /// Maximum entries to return
        #[arg(short, long, default_value = "100")]
        limit: u32,
    },

    /// Notifications
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },

    /// Render the kanban board
    Board,

    /// Pipeline statistics
    Stats,

    /// Export a full database snapshot
    Snapshot {
        /// Destination file
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
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
// Opportunity Commands
// ============================================================================

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Client (account) name
    pub client: String,

    /// Project name
    pub project: String,

    /// Estimated budget
    #[arg(short, long, default_value = "0")]
    pub budget: f64,

    /// Deadline (YYYY-MM-DD)
    #[arg(short, long)]
    pub deadline: String,

    /// Free-text description of the client's needs
    #[arg(short, long, default_value = "")]
    pub needs: String,

    /// Technologies (-t react -t node or -t react,node)
    #[arg(short, long, value_delimiter = ',')]
    pub tech: Vec<String>,

    /// Initial status
    #[arg(short, long, default_value = "reception")]
    pub status: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter by status (or "all")
    #[arg(short, long, default_value = "all")]
    pub status: String,

    /// Maximum records to return
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Opportunity ID
    pub id: String,

    /// New client name
    #[arg(long)]
    pub client: Option<String>,

    /// New project name
    #[arg(long)]
    pub project: Option<String>,

    /// New budget
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// New deadline (YYYY-MM-DD)
    #[arg(short, long)]
    pub deadline: Option<String>,

    /// New needs description
    #[arg(short, long)]
    pub needs: Option<String>,

    /// New technologies list (comma-separated, replaces the old list)
    #[arg(short, long, value_delimiter = ',')]
    pub tech: Option<Vec<String>>,

    /// New status
    #[arg(short, long)]
    pub status: Option<String>,
}

// ============================================================================
// Comment Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Add a comment to an opportunity
    Add {
        /// Opportunity ID
        id: String,

        /// Comment text
        content: String,
    },

    /// List the comments of an opportunity
    List {
        /// Opportunity ID
        id: String,
    },
}

// ============================================================================
// Attachment Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum AttachCommands {
    /// Attach a file to an opportunity
    Add {
        /// Opportunity ID
        id: String,

        /// File to attach
        file: PathBuf,

        /// Override the stored file name
        #[arg(long)]
        name: Option<String>,

        /// Override the MIME type (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,
    },

    /// List the attachments of an opportunity
    List {
        /// Opportunity ID
        id: String,
    },

    /// Remove an attachment
    Delete {
        /// Attachment ID
        id: String,

        /// Opportunity the attachment belongs to
        #[arg(long)]
        avv: String,
    },
}

// ============================================================================
// Notification Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// List unread notifications
    List,

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark all notifications as read
    Clear,
}
