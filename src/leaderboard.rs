//! Leaderboard aggregation over the recorded score history.
//!
//! Two rules exist and they are intentionally different:
//!
//! - **Global**: per player, sum correct answers and question totals across
//!   every recorded attempt in every category. Rewards volume of play.
//! - **Category**: per player, only attempts in one category count, and only
//!   the best one (highest correct count) is kept together with its total.
//!
//! Ranking is descending by the measure. Global ties are ordered by player
//! name. Category ties are ordered by who reached the score first, then by
//! player name. Within one player's attempts, an equal best keeps the earliest.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use tracing::{debug, instrument};

use crate::Score;

/// Scope label selecting the global leaderboard.
pub const GLOBAL_SCOPE: &str = "global";

/// Which leaderboard to compute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeaderboardScope {
    /// Cumulative standings across all categories.
    Global,
    /// Best-attempt standings within one category label.
    Category(String),
}

impl LeaderboardScope {
    /// Parses a scope label; `"global"` and the empty string mean [`LeaderboardScope::Global`].
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == GLOBAL_SCOPE {
            Self::Global
        } else {
            Self::Category(label.to_string())
        }
    }

    /// Returns the label used for display and for the command line.
    pub fn label(&self) -> &str {
        match self {
            Self::Global => GLOBAL_SCOPE,
            Self::Category(category) => category,
        }
    }
}

impl fmt::Display for LeaderboardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct LeaderboardEntry {
    /// 1-based rank.
    rank: usize,
    /// Player display name.
    player: String,
    /// Summed (global) or best (category) correct count.
    measure: i32,
    /// Denominator matching `measure`.
    total: i32,
    /// Most recent attempt (global) or time of the best attempt (category).
    played_at: NaiveDateTime,
}

impl LeaderboardEntry {
    /// Success rate as a percentage (0.0–100.0).
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.measure as f64 / self.total as f64) * 100.0
        }
    }
}

/// A player's standing before ranks are assigned.
#[derive(Debug, Clone)]
struct Standing {
    player: String,
    measure: i32,
    total: i32,
    played_at: NaiveDateTime,
    first_seen: usize,
}

/// Computes the leaderboard for `scope` from `history`, keeping at most `limit` rows.
///
/// `history` is expected in recording order. Records from other categories are
/// ignored in category scope. The input is never modified.
#[instrument(skip(history), fields(records = history.len()))]
pub fn aggregate(scope: &LeaderboardScope, history: &[Score], limit: usize) -> Vec<LeaderboardEntry> {
    let mut standings = match scope {
        LeaderboardScope::Global => global_standings(history),
        LeaderboardScope::Category(category) => category_standings(history, category),
    };

    match scope {
        LeaderboardScope::Global => standings.sort_by(|a, b| {
            b.measure
                .cmp(&a.measure)
                .then_with(|| a.player.cmp(&b.player))
        }),
        LeaderboardScope::Category(_) => standings.sort_by(|a, b| {
            b.measure
                .cmp(&a.measure)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
                .then_with(|| a.player.cmp(&b.player))
        }),
    }

    let entries: Vec<LeaderboardEntry> = standings
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, s)| LeaderboardEntry {
            rank: i + 1,
            player: s.player,
            measure: s.measure,
            total: s.total,
            played_at: s.played_at,
        })
        .collect();
    debug!(entries = entries.len(), "Leaderboard aggregated");
    entries
}

/// Sums every attempt per player.
fn global_standings(history: &[Score]) -> Vec<Standing> {
    let mut by_player: HashMap<&str, Standing> = HashMap::new();
    for (i, score) in history.iter().enumerate() {
        by_player
            .entry(score.player().as_str())
            .and_modify(|s| {
                s.measure = s.measure.saturating_add(*score.correct());
                s.total = s.total.saturating_add(*score.total());
                s.played_at = s.played_at.max(*score.completed_at());
            })
            .or_insert_with(|| Standing {
                player: score.player().clone(),
                measure: *score.correct(),
                total: *score.total(),
                played_at: *score.completed_at(),
                first_seen: i,
            });
    }
    by_player.into_values().collect()
}

/// Keeps each player's best attempt within `category`.
fn category_standings(history: &[Score], category: &str) -> Vec<Standing> {
    let mut by_player: HashMap<&str, Standing> = HashMap::new();
    for (i, score) in history
        .iter()
        .enumerate()
        .filter(|(_, s)| s.category() == category)
    {
        let candidate = Standing {
            player: score.player().clone(),
            measure: *score.correct(),
            total: *score.total(),
            played_at: *score.completed_at(),
            first_seen: i,
        };
        by_player
            .entry(score.player().as_str())
            .and_modify(|best| {
                if candidate.measure > best.measure {
                    *best = candidate.clone();
                }
            })
            .or_insert(candidate);
    }
    by_player.into_values().collect()
}
