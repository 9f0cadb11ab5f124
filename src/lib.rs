//! Strictly Quiz library - a turn-based trivia quiz for terminal sessions
//!
//! Players identify with a display name, answer multiple-choice questions
//! whose options are reshuffled on every presentation, and compare results on
//! a shared scoreboard.
//!
//! # Architecture
//!
//! - **Quiz**: shuffle engine, per-attempt state machine and `Score`
//! - **Leaderboard**: global (cumulative) and category (best attempt) rankings
//! - **Db**: SQLite scoreboard via diesel
//! - **Session**: per-connection screen state machine (identity, menu, quiz, leaderboard)
//! - **Transport**: local terminal driver and a telnet-style TCP server
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_quiz::{QuestionBank, ScoreRepository, SessionController, SessionSettings};
//!
//! # fn example() -> anyhow::Result<()> {
//! let questions = Arc::new(QuestionBank::defaults());
//! let repository = ScoreRepository::open("./data/quiz.db")?;
//! let controller = SessionController::new(questions, repository, SessionSettings::new());
//! strictly_quiz::run_local(controller)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod leaderboard;
mod questions;
mod quiz;
mod session;
mod transport;

// Crate-level exports - Configuration
pub use config::{ConfigError, QuizConfig};

// Crate-level exports - Questions
pub use questions::{ALL_CATEGORIES, Question, QuestionBank};

// Crate-level exports - Quiz core
pub use quiz::{PresentedQuestion, QuizInput, QuizPhase, QuizSession, QuizStep, Score, present};

// Crate-level exports - Leaderboard
pub use leaderboard::{GLOBAL_SCOPE, LeaderboardEntry, LeaderboardScope, aggregate};

// Crate-level exports - Persistence
pub use db::{DbError, NewScoreRecord, ScoreRecord, ScoreRepository, ScoreboardStats};

// Crate-level exports - Session orchestration
pub use session::{
    CategoryPurpose, CategorySelectScreen, IdentityScreen, LeaderboardScreen, MAX_NAME_LEN,
    MIN_NAME_LEN, MenuOption, MenuScreen, QuizScreen, Screen, ScreenKind, ScreenTransition,
    SessionControl, SessionController, SessionSettings, validate_display_name,
};

// Crate-level exports - Transport
pub use transport::{
    FrameSink, InputEvent, MAX_HEIGHT, MAX_WIDTH, ServeOptions, TelnetDecoder, clamp_size,
    negotiation, run_local, serve, serve_on,
};
