//! Per-session settings derived from the process configuration.

use derive_setters::Setters;
use tracing::instrument;

use crate::QuizConfig;

/// Knobs every session controller is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct SessionSettings {
    /// Maximum number of leaderboard rows shown.
    pub leaderboard_limit: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            leaderboard_limit: 10,
        }
    }
}

impl SessionSettings {
    /// Creates settings with defaults.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<&QuizConfig> for SessionSettings {
    fn from(config: &QuizConfig) -> Self {
        Self::new().with_leaderboard_limit(*config.leaderboard_limit())
    }
}
