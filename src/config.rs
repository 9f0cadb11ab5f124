//! Quiz server configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Configuration shared by the local and server front ends.
///
/// Every field has a default, so an empty or missing file yields a usable
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct QuizConfig {
    /// Address the server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the server listens on.
    #[serde(default = "default_port")]
    port: u16,

    /// Path of the SQLite scoreboard.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Path of the JSON question file.
    #[serde(default = "default_questions_path")]
    questions_path: String,

    /// Maximum number of leaderboard rows shown.
    #[serde(default = "default_leaderboard_limit")]
    leaderboard_limit: usize,

    /// Screen width assumed for remote clients until they report their size.
    #[serde(default = "default_screen_width")]
    screen_width: u16,

    /// Screen height assumed for remote clients until they report their size.
    #[serde(default = "default_screen_height")]
    screen_height: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    2323
}

fn default_db_path() -> String {
    "./data/quiz.db".to_string()
}

fn default_questions_path() -> String {
    "./questions.json".to_string()
}

fn default_leaderboard_limit() -> usize {
    10
}

fn default_screen_width() -> u16 {
    80
}

fn default_screen_height() -> u16 {
    24
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            questions_path: default_questions_path(),
            leaderboard_limit: default_leaderboard_limit(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl QuizConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(db_path = %config.db_path, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = 4000\nleaderboard_limit = 5").expect("write");

        let config = QuizConfig::from_file(file.path()).expect("parse");
        assert_eq!(*config.port(), 4000);
        assert_eq!(*config.leaderboard_limit(), 5);
        assert_eq!(config.db_path(), "./data/quiz.db");
        assert_eq!(*config.screen_width(), 80);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = QuizConfig::load_or_default("/no/such/strictly_quiz.toml").expect("defaults");
        assert_eq!(config, QuizConfig::default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = \"not a number\"").expect("write");
        let err = QuizConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn setters_override_fields() {
        let config = QuizConfig::default().with_port(9000u16).with_host("127.0.0.1");
        assert_eq!(*config.port(), 9000);
        assert_eq!(config.host(), "127.0.0.1");
    }
}
