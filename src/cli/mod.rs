//! CLI interface for songreviews

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "songreviews")]
#[command(version)]
#[command(about = "Song review API with token authentication", long_about = None)]
pub struct Cli {
    /// Path to songreviews.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "SONGREVIEWS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new songreviews.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register a user without going through the API
    AddUser {
        /// Username for the new account
        username: String,

        /// Password (prompted for when omitted)
        #[arg(long, env = "SONGREVIEWS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List stored reviews
    Reviews {
        /// Number of reviews to skip
        #[arg(long, default_value = "0")]
        skip: i64,

        /// Maximum number of reviews to show
        #[arg(short, long, default_value = "100")]
        limit: i64,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
