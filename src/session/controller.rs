//! Session controller — the state machine driving one player's connection.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Frame;
use tracing::{debug, info, instrument, warn};

use crate::session::screen::{CategoryPurpose, Screen, ScreenTransition};
use crate::session::screens::{
    CategorySelectScreen, IdentityScreen, LeaderboardScreen, MenuScreen, QuizScreen,
};
use crate::session::settings::SessionSettings;
use crate::{
    InputEvent, LeaderboardScope, QuestionBank, QuizSession, Score, ScoreRepository,
};

/// Shown on the menu after a score could not be written.
const SAVE_FAILED_NOTICE: &str = "Your score could not be saved. Sorry about that!";

/// Active screen in the session state machine.
#[derive(Debug)]
enum ActiveScreen {
    Identity(IdentityScreen),
    Menu(MenuScreen),
    CategorySelect(CategorySelectScreen),
    Quiz(QuizScreen),
    Leaderboard(LeaderboardScreen),
}

/// Which screen is active, without its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// Display-name prompt.
    Identity,
    /// Main menu.
    Menu,
    /// Category picker.
    CategorySelect,
    /// Quiz in progress (or its final screen).
    Quiz,
    /// Leaderboard.
    Leaderboard,
}

/// Whether the connection should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// Render the next frame and wait for more input.
    Continue,
    /// Close the connection.
    Terminate,
}

/// Controller that drives one player's session.
///
/// Holds shared, read-only collaborators (question bank, repository) and the
/// session's own random generator. Feed it [`InputEvent`]s with
/// [`SessionController::handle_event`] and draw it with
/// [`SessionController::render`].
#[derive(Debug)]
pub struct SessionController {
    questions: Arc<QuestionBank>,
    repository: ScoreRepository,
    settings: SessionSettings,
    rng: StdRng,
    player: Option<String>,
    screen: ActiveScreen,
}

impl SessionController {
    /// Creates a controller whose shuffles draw from a freshly seeded generator.
    #[instrument(skip(questions, repository))]
    pub fn new(
        questions: Arc<QuestionBank>,
        repository: ScoreRepository,
        settings: SessionSettings,
    ) -> Self {
        Self::with_rng(questions, repository, settings, StdRng::from_os_rng())
    }

    /// Creates a controller with an explicit random generator.
    #[instrument(skip(questions, repository, rng))]
    pub fn with_rng(
        questions: Arc<QuestionBank>,
        repository: ScoreRepository,
        settings: SessionSettings,
        rng: StdRng,
    ) -> Self {
        info!(questions = questions.len(), "Creating SessionController");
        Self {
            questions,
            repository,
            settings,
            rng,
            player: None,
            screen: ActiveScreen::Identity(IdentityScreen::new()),
        }
    }

    /// Returns the identified player, if any.
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Returns which screen is active.
    pub fn screen_kind(&self) -> ScreenKind {
        match &self.screen {
            ActiveScreen::Identity(_) => ScreenKind::Identity,
            ActiveScreen::Menu(_) => ScreenKind::Menu,
            ActiveScreen::CategorySelect(_) => ScreenKind::CategorySelect,
            ActiveScreen::Quiz(_) => ScreenKind::Quiz,
            ActiveScreen::Leaderboard(_) => ScreenKind::Leaderboard,
        }
    }

    /// Returns the quiz in progress, if the quiz screen is active.
    pub fn quiz(&self) -> Option<&QuizSession> {
        match &self.screen {
            ActiveScreen::Quiz(s) => Some(s.session()),
            _ => None,
        }
    }

    /// Returns the leaderboard being shown, if the leaderboard screen is active.
    pub fn leaderboard(&self) -> Option<&LeaderboardScreen> {
        match &self.screen {
            ActiveScreen::Leaderboard(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the menu notice, if the menu is showing one.
    pub fn notice(&self) -> Option<&str> {
        match &self.screen {
            ActiveScreen::Menu(s) => s.notice().as_deref(),
            _ => None,
        }
    }

    /// Renders the active screen.
    #[instrument(skip(self, frame))]
    pub fn render(&self, frame: &mut Frame) {
        match &self.screen {
            ActiveScreen::Identity(s) => s.render(frame),
            ActiveScreen::Menu(s) => s.render(frame),
            ActiveScreen::CategorySelect(s) => s.render(frame),
            ActiveScreen::Quiz(s) => s.render(frame),
            ActiveScreen::Leaderboard(s) => s.render(frame),
        }
    }

    /// Processes one input event.
    ///
    /// Ctrl-C ends the session from any screen. Resize and tick events only
    /// request a redraw.
    #[instrument(skip(self), fields(screen = ?self.screen_kind()))]
    pub fn handle_event(&mut self, event: InputEvent) -> SessionControl {
        let key = match event {
            InputEvent::Key(key) => key,
            InputEvent::Resize { width, height } => {
                debug!(width, height, "Resize");
                return SessionControl::Continue;
            }
            InputEvent::Tick => return SessionControl::Continue,
        };

        // Crossterm reports both press and release on some platforms.
        if key.kind == KeyEventKind::Release {
            return SessionControl::Continue;
        }

        if is_interrupt(&key) {
            info!(player = ?self.player, "Session interrupted");
            return SessionControl::Terminate;
        }

        let transition = match &mut self.screen {
            ActiveScreen::Identity(s) => s.handle_key(key),
            ActiveScreen::Menu(s) => s.handle_key(key),
            ActiveScreen::CategorySelect(s) => s.handle_key(key),
            ActiveScreen::Quiz(s) => s.handle_key(key),
            ActiveScreen::Leaderboard(s) => s.handle_key(key),
        };

        self.apply_transition(transition)
    }

    /// Applies a screen transition.
    #[instrument(skip(self))]
    fn apply_transition(&mut self, transition: ScreenTransition) -> SessionControl {
        match transition {
            ScreenTransition::Stay => return SessionControl::Continue,

            ScreenTransition::Quit => {
                info!(player = ?self.player, "Session quitting");
                return SessionControl::Terminate;
            }

            ScreenTransition::IdentityConfirmed { player } => {
                info!(player = %player, "Player identified, navigating to Menu");
                self.player = Some(player.clone());
                self.screen = ActiveScreen::Menu(MenuScreen::new(player, None));
            }

            ScreenTransition::GoToMenu => {
                self.screen = self.menu_screen(None);
            }

            ScreenTransition::GoToCategorySelect { purpose } => {
                let categories = match purpose {
                    CategoryPurpose::Play => self.questions.categories(),
                    CategoryPurpose::Leaderboard => {
                        self.repository.categories().unwrap_or_else(|e| {
                            warn!(error = %e, "Failed to load scored categories");
                            Vec::new()
                        })
                    }
                };
                info!(?purpose, count = categories.len(), "Navigating to CategorySelect");
                self.screen =
                    ActiveScreen::CategorySelect(CategorySelectScreen::new(purpose, categories));
            }

            ScreenTransition::StartQuiz { category } => {
                self.screen = self.quiz_screen(category);
            }

            ScreenTransition::GoToLeaderboard { scope } => {
                self.screen = self.leaderboard_screen(scope);
            }

            ScreenTransition::QuizFinished(score) => {
                let notice = self.record_score(&score);
                self.screen = self.menu_screen(notice);
            }
        }
        SessionControl::Continue
    }

    /// Builds the menu, or the identity prompt if nobody has identified yet.
    #[instrument(skip(self))]
    fn menu_screen(&self, notice: Option<String>) -> ActiveScreen {
        match &self.player {
            Some(player) => {
                info!(player = %player, "Navigating to Menu");
                ActiveScreen::Menu(MenuScreen::new(player.clone(), notice))
            }
            None => {
                warn!("No player for Menu — redirecting to Identity");
                ActiveScreen::Identity(IdentityScreen::new())
            }
        }
    }

    /// Starts a quiz over `category` with freshly shuffled questions.
    #[instrument(skip(self))]
    fn quiz_screen(&mut self, category: String) -> ActiveScreen {
        let Some(player) = self.player.clone() else {
            warn!("No player for Quiz — redirecting to Identity");
            return ActiveScreen::Identity(IdentityScreen::new());
        };

        let questions = self.questions.for_category(&category);
        let previous_best = self
            .repository
            .best_score(&player, &category)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load previous best");
                None
            });
        info!(
            player = %player,
            category = %category,
            questions = questions.len(),
            "Navigating to Quiz"
        );
        let session = QuizSession::new(player, category, &questions, &mut self.rng);
        ActiveScreen::Quiz(QuizScreen::new(session, previous_best))
    }

    /// Loads standings for `scope`; read failures show an empty board.
    #[instrument(skip(self))]
    fn leaderboard_screen(&self, scope: LeaderboardScope) -> ActiveScreen {
        let Some(player) = self.player.clone() else {
            warn!("No player for Leaderboard — redirecting to Identity");
            return ActiveScreen::Identity(IdentityScreen::new());
        };

        let entries = self
            .repository
            .query(&scope, self.settings.leaderboard_limit)
            .unwrap_or_else(|e| {
                warn!(error = %e, scope = %scope, "Failed to load leaderboard");
                Vec::new()
            });
        let stats = self
            .repository
            .stats()
            .inspect_err(|e| warn!(error = %e, "Failed to load scoreboard stats"))
            .ok();
        info!(scope = %scope, entries = entries.len(), "Navigating to Leaderboard");
        ActiveScreen::Leaderboard(LeaderboardScreen::new(player, scope, entries, stats))
    }

    /// Persists a finished score, returning a notice for the menu on failure.
    #[instrument(skip(self, score), fields(player = %score.player(), correct = score.correct(), total = score.total()))]
    fn record_score(&self, score: &Score) -> Option<String> {
        match self.repository.append(score) {
            Ok(record) => {
                info!(score_id = record.id(), "Score saved");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to save score");
                Some(SAVE_FAILED_NOTICE.to_string())
            }
        }
    }
}

/// Returns true for the global quit key (Ctrl-C).
fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
