//! Quiz core: answer shuffling, the per-attempt state machine, and scores.

mod score;
mod session;
mod shuffle;

pub use score::Score;
pub use session::{QuizInput, QuizPhase, QuizSession, QuizStep};
pub use shuffle::{PresentedQuestion, present};
