//! Per-connection session orchestration: identity, menu, quiz, and leaderboard screens.

mod controller;
mod screen;
mod screens;
mod settings;

pub use controller::{ScreenKind, SessionControl, SessionController};
pub use screen::{CategoryPurpose, Screen, ScreenTransition};
pub use screens::{
    CategorySelectScreen, IdentityScreen, LeaderboardScreen, MAX_NAME_LEN, MIN_NAME_LEN,
    MenuOption, MenuScreen, QuizScreen, validate_display_name,
};
pub use settings::SessionSettings;
