//! Database models for recorded scores.

use std::fmt;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::Score;
use crate::db::schema;

/// A score row as stored in the `scores` table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::scores)]
pub struct ScoreRecord {
    id: i32,
    username: String,
    category: String,
    score: i32,
    total: i32,
    created_at: NaiveDateTime,
}

impl ScoreRecord {
    /// Converts the row back into the domain [`Score`].
    #[instrument(skip(self), fields(id = self.id))]
    pub fn to_score(&self) -> Score {
        Score::new(
            self.username.clone(),
            self.category.clone(),
            self.score,
            self.total,
            self.created_at,
        )
    }
}

/// Insertable score row.
#[derive(Debug, Clone, Insertable, Getters, new)]
#[diesel(table_name = schema::scores)]
pub struct NewScoreRecord {
    username: String,
    category: String,
    score: i32,
    total: i32,
    created_at: NaiveDateTime,
}

impl From<&Score> for NewScoreRecord {
    fn from(score: &Score) -> Self {
        Self::new(
            score.player().clone(),
            score.category().clone(),
            *score.correct(),
            *score.total(),
            *score.completed_at(),
        )
    }
}

/// Attempt and player counts across the whole scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, new)]
pub struct ScoreboardStats {
    total_attempts: i64,
    unique_players: i64,
}

impl fmt::Display for ScoreboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total attempts: {} | Unique players: {}",
            self.total_attempts, self.unique_players
        )
    }
}
