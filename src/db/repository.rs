//! Scoreboard repository: append-only score history plus leaderboard queries.

use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewScoreRecord, ScoreRecord, ScoreboardStats, schema};
use crate::{LeaderboardEntry, LeaderboardScope, Score, aggregate};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Repository for recorded scores.
///
/// Every operation opens its own connection, so a clone can be handed to each
/// session and used concurrently.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Opens the scoreboard at `db_path`, creating the file, its parent
    /// directory, and the schema as needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the directory cannot be created, the database
    /// cannot be opened, or migrations fail.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, DbError> {
        let db_path = db_path.as_ref().to_string();
        info!(path = %db_path, "Opening ScoreRepository");

        if let Some(parent) = Path::new(&db_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::new(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?.len();
        info!(applied, "Migrations up to date");
        Ok(repo)
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Appends a completed score in a single insert.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be reached or the insert fails.
    #[instrument(skip(self, score), fields(player = %score.player(), category = %score.category()))]
    pub fn append(&self, score: &Score) -> Result<ScoreRecord, DbError> {
        debug!(correct = score.correct(), total = score.total(), "Appending score");
        let mut conn = self.connection()?;

        let record = diesel::insert_into(schema::scores::table)
            .values(NewScoreRecord::from(score))
            .returning(ScoreRecord::as_returning())
            .get_result(&mut conn)?;

        info!(score_id = record.id(), "Score recorded");
        Ok(record)
    }

    /// Loads the score history relevant to `scope`, in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn history(&self, scope: &LeaderboardScope) -> Result<Vec<Score>, DbError> {
        let mut conn = self.connection()?;

        let records = match scope {
            LeaderboardScope::Global => schema::scores::table
                .order(schema::scores::id.asc())
                .select(ScoreRecord::as_select())
                .load(&mut conn)?,
            LeaderboardScope::Category(category) => schema::scores::table
                .filter(schema::scores::category.eq(category))
                .order(schema::scores::id.asc())
                .select(ScoreRecord::as_select())
                .load(&mut conn)?,
        };

        debug!(count = records.len(), "Score history loaded");
        Ok(records.iter().map(ScoreRecord::to_score).collect())
    }

    /// Computes the ranked leaderboard for `scope`, at most `limit` rows.
    ///
    /// No matching scores yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the history cannot be read.
    #[instrument(skip(self))]
    pub fn query(
        &self,
        scope: &LeaderboardScope,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, DbError> {
        let history = self.history(scope)?;
        let entries = aggregate(scope, &history, limit);
        info!(scope = %scope, entries = entries.len(), "Leaderboard computed");
        Ok(entries)
    }

    /// Counts recorded attempts and distinct players.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn stats(&self) -> Result<ScoreboardStats, DbError> {
        let mut conn = self.connection()?;

        let total_attempts = schema::scores::table.count().get_result::<i64>(&mut conn)?;
        let unique_players = schema::scores::table
            .select(diesel::dsl::count_distinct(schema::scores::username))
            .get_result::<i64>(&mut conn)?;

        let stats = ScoreboardStats::new(total_attempts, unique_players);
        debug!(%stats, "Scoreboard stats computed");
        Ok(stats)
    }

    /// Returns a player's best correct count in a category, if they have played it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn best_score(&self, player: &str, category: &str) -> Result<Option<i32>, DbError> {
        let mut conn = self.connection()?;

        let best = schema::scores::table
            .filter(schema::scores::username.eq(player))
            .filter(schema::scores::category.eq(category))
            .select(diesel::dsl::max(schema::scores::score))
            .get_result::<Option<i32>>(&mut conn)?;

        debug!(?best, "Best score loaded");
        Ok(best)
    }

    /// Lists the distinct categories that have recorded scores, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn categories(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.connection()?;

        let categories = schema::scores::table
            .select(schema::scores::category)
            .distinct()
            .order(schema::scores::category.asc())
            .load::<String>(&mut conn)?;

        debug!(count = categories.len(), "Scored categories loaded");
        Ok(categories)
    }
}
