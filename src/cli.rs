//! Command-line interface for strictly_quiz.

use clap::{Parser, Subcommand};

/// Strictly Quiz - terminal trivia quiz with a shared scoreboard
#[derive(Parser, Debug)]
#[command(name = "strictly_quiz")]
#[command(about = "Terminal trivia quiz with a shared scoreboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (missing file = defaults)
    #[arg(long, global = true, default_value = "strictly_quiz.toml")]
    pub config: std::path::PathBuf,

    /// Override the scoreboard database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Override the question file path
    #[arg(long, global = true)]
    pub questions: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one session in this terminal
    Play,

    /// Serve sessions to telnet clients over TCP
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a leaderboard to stdout
    Leaderboard {
        /// "global" or a category name
        #[arg(short, long, default_value = "global")]
        scope: String,

        /// Maximum rows (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
