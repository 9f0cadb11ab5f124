//! Screen trait and transition type for the session state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::{LeaderboardScope, Score};

/// Why the category picker was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPurpose {
    /// Pick a category to play.
    Play,
    /// Pick a category leaderboard to view.
    Leaderboard,
}

/// The result of handling a key on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`SessionController`](crate::SessionController) state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// The player entered a valid display name.
    IdentityConfirmed {
        /// Trimmed display name.
        player: String,
    },
    /// Return to the main menu.
    GoToMenu,
    /// Open the category picker.
    GoToCategorySelect {
        /// What the picked category is for.
        purpose: CategoryPurpose,
    },
    /// Start a quiz over a category label (`"all"` for every question).
    StartQuiz {
        /// Category label.
        category: String,
    },
    /// Show a leaderboard.
    GoToLeaderboard {
        /// Aggregation scope.
        scope: LeaderboardScope,
    },
    /// The quiz finished normally and its score should be recorded.
    QuizFinished(Score),
    /// End the whole session.
    Quit,
}

/// Trait implemented by each screen in the session state machine.
///
/// Each screen owns its own state, renders its UI, and handles key events.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition;
}
