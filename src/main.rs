//! Strictly Quiz - Unified CLI
//!
//! Runs the quiz in this terminal, serves it to telnet clients, or prints the
//! scoreboard.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_quiz::{
    LeaderboardScope, QuestionBank, QuizConfig, ScoreRepository, ServeOptions, SessionController,
    SessionSettings,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,strictly_quiz=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play => run_play(&cli),
        Command::Serve { ref host, port } => run_serve(&cli, host.clone(), port).await,
        Command::Leaderboard { ref scope, limit } => run_leaderboard(&cli, scope, limit),
    }
}

/// Loads the config file and applies command-line overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<QuizConfig> {
    let mut config = QuizConfig::load_or_default(&cli.config)?;
    if let Some(db_path) = &cli.db_path {
        config = config.with_db_path(db_path);
    }
    if let Some(questions) = &cli.questions {
        config = config.with_questions_path(questions);
    }
    Ok(config)
}

/// Play one session in this terminal.
fn run_play(cli: &Cli) -> Result<()> {
    // Log to a file so tracing output never lands on the quiz screen
    let log_file = std::fs::File::create("strictly_quiz.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("Starting Strictly Quiz in local mode");

    let config = load_config(cli)?;
    let questions = Arc::new(QuestionBank::load_or_default(config.questions_path()));
    let repository = ScoreRepository::open(config.db_path())?;
    let controller =
        SessionController::new(questions, repository, SessionSettings::from(&config));

    strictly_quiz::run_local(controller)
}

/// Serve sessions over TCP.
async fn run_serve(cli: &Cli, host: Option<String>, port: Option<u16>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    info!("Starting Strictly Quiz server");

    let mut config = load_config(cli)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let questions = Arc::new(QuestionBank::load_or_default(config.questions_path()));
    info!(
        questions = questions.len(),
        categories = questions.categories().len(),
        "Question bank ready"
    );
    let repository = ScoreRepository::open(config.db_path())?;

    strictly_quiz::serve(ServeOptions::from(&config), questions, repository).await
}

/// Print a leaderboard and scoreboard stats to stdout.
fn run_leaderboard(cli: &Cli, scope: &str, limit: Option<usize>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli)?;
    let repository = ScoreRepository::open(config.db_path())?;
    let scope = LeaderboardScope::parse(scope);
    let limit = limit.unwrap_or(*config.leaderboard_limit());

    let entries = repository.query(&scope, limit)?;
    let stats = repository.stats()?;

    match &scope {
        LeaderboardScope::Global => println!("Global leaderboard"),
        LeaderboardScope::Category(category) => println!("Leaderboard for {}", category),
    }
    if entries.is_empty() {
        println!("No scores recorded yet.");
    } else {
        println!("{:<6}{:<22}{:>10}{:>10}", "Rank", "Player", "Score", "Rate");
        for entry in &entries {
            println!(
                "{:<6}{:<22}{:>10}{:>9.1}%",
                entry.rank(),
                entry.player(),
                format!("{}/{}", entry.measure(), entry.total()),
                entry.percentage()
            );
        }
    }
    println!("{}", stats);
    Ok(())
}
