//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use taskdesk_client::services::TaskFilter;

#[derive(Parser)]
#[command(
    name = "taskdesk",
    about = "Taskdesk - command-line client for the task API",
    version,
    author = "TRS Team"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL
    #[arg(long, env = "TASKDESK_API_BASE_URL", help = "API base URL")]
    pub base_url: Option<String>,

    /// Bearer token for authenticated calls
    #[arg(
        long,
        env = "TASKDESK_ACCESS_TOKEN",
        hide_env_values = true,
        help = "Access token sent as a bearer credential"
    )]
    pub token: Option<String>,

    /// Client configuration file
    #[arg(long, help = "Client configuration file (TOML or JSON)")]
    pub config: Option<PathBuf>,

    /// Per-attempt timeout
    #[arg(long, help = "Per-attempt timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a raw request through the client pipeline
    Request {
        #[arg(help = "HTTP method (GET, POST, PUT, PATCH, DELETE)")]
        method: String,

        #[arg(help = "Path relative to the base URL (e.g., /task/)")]
        path: String,

        /// Request body as JSON string
        #[arg(short, long, help = "Request body as JSON string")]
        data: Option<String>,

        #[arg(long, value_enum, default_value = "pretty", help = "Output format")]
        format: OutputFormat,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Show or update the current user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List tasks
    List {
        #[arg(
            long,
            default_value = "all",
            help = "Which tasks to list: all, completed or incomplete"
        )]
        filter: TaskFilter,

        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },

    /// Create a task
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, help = "Due date (YYYY-MM-DD or RFC 3339)")]
        due_date: Option<String>,
    },

    /// Change fields of a task
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        due_date: Option<String>,
    },

    /// Mark a task complete
    Complete {
        id: String,

        #[arg(long, help = "Mark the task incomplete instead")]
        undo: bool,
    },

    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the profile
    Show {
        #[arg(long, value_enum, default_value = "pretty", help = "Output format")]
        format: OutputFormat,
    },

    /// Update first and last name
    Update {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON
    Json,
}

impl OutputFormat {
    /// Format a JSON value according to the output format
    pub fn format_json(&self, value: &JsonValue) -> Result<String, serde_json::Error> {
        match self {
            // commands that support tables render them themselves
            Self::Table | Self::Pretty => serde_json::to_string_pretty(value),
            Self::Json => serde_json::to_string(value),
        }
    }
}
