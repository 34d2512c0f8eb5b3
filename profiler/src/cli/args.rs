//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "profiler")]
#[command(about = "Summarize a GitHub user's recent activity", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Gemini API key for the summarization service
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Config file (default: nearest .profiler.toml, then the global config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one user's recent repositories
    Summarize {
        /// GitHub username
        username: String,
    },
    /// Summarize two users side by side
    Compare {
        /// First GitHub username
        first: String,
        /// Second GitHub username
        second: String,
    },
    /// Print the enriched profile as JSON without summarizing
    Profile {
        /// GitHub username
        username: String,
    },
    /// Start the HTTP API
    Serve {
        /// Address to bind (default: from config or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: from config or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Personal notes
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
}

#[derive(Subcommand)]
pub enum NotesCommands {
    /// Append a note
    Add {
        /// Note text
        note: String,
    },
    /// List saved notes
    List,
}
