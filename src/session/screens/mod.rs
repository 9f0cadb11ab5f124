//! Screen implementations for the session state machine.

mod category_select;
mod chrome;
mod identity;
mod leaderboard;
mod menu;
mod quiz;

pub use category_select::CategorySelectScreen;
pub use identity::{IdentityScreen, MAX_NAME_LEN, MIN_NAME_LEN, validate_display_name};
pub use leaderboard::LeaderboardScreen;
pub use menu::{MenuOption, MenuScreen};
pub use quiz::QuizScreen;
