//! Main menu — hub for navigation after the player has identified.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, info, instrument};

use crate::ALL_CATEGORIES;
use crate::LeaderboardScope;
use crate::session::screen::{CategoryPurpose, Screen, ScreenTransition};
use crate::session::screens::chrome;

/// Menu options, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuOption {
    /// Play every question.
    Play,
    /// Pick a category, then play it.
    PlayCategory,
    /// Cumulative standings.
    GlobalLeaderboard,
    /// Best-attempt standings for one category.
    CategoryLeaderboard,
    /// End the session.
    Quit,
}

impl MenuOption {
    fn label(self) -> &'static str {
        match self {
            Self::Play => "Play the quiz",
            Self::PlayCategory => "Play a category",
            Self::GlobalLeaderboard => "Global leaderboard",
            Self::CategoryLeaderboard => "Category leaderboard",
            Self::Quit => "Quit",
        }
    }

    fn transition(self) -> ScreenTransition {
        match self {
            Self::Play => ScreenTransition::StartQuiz {
                category: ALL_CATEGORIES.to_string(),
            },
            Self::PlayCategory => ScreenTransition::GoToCategorySelect {
                purpose: CategoryPurpose::Play,
            },
            Self::GlobalLeaderboard => ScreenTransition::GoToLeaderboard {
                scope: LeaderboardScope::Global,
            },
            Self::CategoryLeaderboard => ScreenTransition::GoToCategorySelect {
                purpose: CategoryPurpose::Leaderboard,
            },
            Self::Quit => ScreenTransition::Quit,
        }
    }
}

/// State for the main menu.
#[derive(Debug, Getters)]
pub struct MenuScreen {
    player: String,
    cursor: usize,
    notice: Option<String>,
}

impl MenuScreen {
    /// Creates a menu for `player`, optionally showing a one-shot notice.
    #[instrument(skip(notice))]
    pub fn new(player: String, notice: Option<String>) -> Self {
        debug!(player = %player, has_notice = notice.is_some(), "Initializing MenuScreen");
        Self {
            player,
            cursor: 0,
            notice,
        }
    }

    /// Returns the highlighted option.
    pub fn selected_option(&self) -> MenuOption {
        MenuOption::iter().nth(self.cursor).unwrap_or(MenuOption::Quit)
    }
}

impl Screen for MenuScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ])
            .split(frame.area());

        frame.render_widget(chrome::title(chrome::BANNER), chunks[0]);

        let (greeting, color) = match &self.notice {
            Some(notice) => (notice.clone(), Color::Red),
            None => (format!("Hi, {}! Pick an option to continue.", self.player), Color::Green),
        };
        let greeting = Paragraph::new(greeting)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(greeting, chunks[1]);

        let items: Vec<ListItem> = MenuOption::iter()
            .map(|opt| ListItem::new(opt.label()))
            .collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(menu, chunks[2], &mut list_state);

        frame.render_widget(
            chrome::help("↑↓ / j k: Navigate | Enter: Select | q: Quit"),
            chunks[3],
        );
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                ScreenTransition::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = MenuOption::iter().count() - 1;
                self.cursor = (self.cursor + 1).min(last);
                ScreenTransition::Stay
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let option = self.selected_option();
                info!(option = ?option, "Menu option selected");
                option.transition()
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut MenuScreen, code: KeyCode) -> ScreenTransition {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn cursor_is_bounded() {
        let mut menu = MenuScreen::new("amy".into(), None);
        press(&mut menu, KeyCode::Up);
        assert_eq!(*menu.cursor(), 0);
        for _ in 0..10 {
            press(&mut menu, KeyCode::Down);
        }
        assert_eq!(menu.selected_option(), MenuOption::Quit);
    }

    #[test]
    fn options_map_to_transitions() {
        let mut menu = MenuScreen::new("amy".into(), None);
        assert_eq!(
            press(&mut menu, KeyCode::Enter),
            ScreenTransition::StartQuiz {
                category: "all".into()
            }
        );
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);
        assert_eq!(
            press(&mut menu, KeyCode::Enter),
            ScreenTransition::GoToLeaderboard {
                scope: LeaderboardScope::Global
            }
        );
        press(&mut menu, KeyCode::Char('j'));
        assert_eq!(
            press(&mut menu, KeyCode::Enter),
            ScreenTransition::GoToCategorySelect {
                purpose: CategoryPurpose::Leaderboard
            }
        );
    }

    #[test]
    fn q_quits() {
        let mut menu = MenuScreen::new("amy".into(), None);
        assert_eq!(press(&mut menu, KeyCode::Char('q')), ScreenTransition::Quit);
    }
}
