//! Database persistence layer for quiz scores.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewScoreRecord, ScoreRecord, ScoreboardStats};
pub use repository::ScoreRepository;
