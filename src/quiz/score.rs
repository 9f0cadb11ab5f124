//! The immutable outcome of one completed quiz attempt.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A completed quiz result, handed once to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct Score {
    /// Display name of the player.
    player: String,
    /// Category label the quiz was played in (`"all"` for every question).
    category: String,
    /// Number of correctly answered questions.
    correct: i32,
    /// Number of questions in the attempt.
    total: i32,
    /// When the attempt was completed (UTC).
    completed_at: NaiveDateTime,
}

impl Score {
    /// Success rate as a percentage (0.0–100.0).
    #[instrument(skip(self))]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.correct as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_handles_empty_total() {
        let at = chrono::Utc::now().naive_utc();
        assert_eq!(Score::new("amy".into(), "all".into(), 0, 0, at).percentage(), 0.0);
        assert_eq!(Score::new("amy".into(), "all".into(), 3, 4, at).percentage(), 75.0);
    }
}
