//! Category picker — choose a category to play or a category leaderboard to view.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::LeaderboardScope;
use crate::session::screen::{CategoryPurpose, Screen, ScreenTransition};
use crate::session::screens::chrome;

/// State for the category picker.
#[derive(Debug, Getters)]
pub struct CategorySelectScreen {
    purpose: CategoryPurpose,
    categories: Vec<String>,
    cursor: usize,
}

impl CategorySelectScreen {
    /// Creates a picker over `categories`.
    #[instrument(skip(categories), fields(count = categories.len()))]
    pub fn new(purpose: CategoryPurpose, categories: Vec<String>) -> Self {
        debug!(?purpose, "Initializing CategorySelectScreen");
        Self {
            purpose,
            categories,
            cursor: 0,
        }
    }

    /// Returns the highlighted category, if any.
    pub fn selected_category(&self) -> Option<&str> {
        self.categories.get(self.cursor).map(String::as_str)
    }
}

impl Screen for CategorySelectScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let heading = match self.purpose {
            CategoryPurpose::Play => "Choose a category to play",
            CategoryPurpose::Leaderboard => "Choose a category leaderboard",
        };
        frame.render_widget(chrome::title(heading), chunks[0]);

        if self.categories.is_empty() {
            let empty = Paragraph::new("No categories available yet.")
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[1]);
            frame.render_widget(chrome::help("Esc / q: Back to menu"), chunks[2]);
            return;
        }

        let items: Vec<ListItem> = self
            .categories
            .iter()
            .map(|c| ListItem::new(c.as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Categories"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        frame.render_widget(
            chrome::help("↑↓ / j k: Navigate | Enter: Select | Esc / q: Back"),
            chunks[2],
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
                let last = self.categories.len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
                ScreenTransition::Stay
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(category) = self.selected_category() else {
                    return ScreenTransition::Stay;
                };
                info!(category = %category, purpose = ?self.purpose, "Category selected");
                match self.purpose {
                    CategoryPurpose::Play => ScreenTransition::StartQuiz {
                        category: category.to_string(),
                    },
                    CategoryPurpose::Leaderboard => ScreenTransition::GoToLeaderboard {
                        scope: LeaderboardScope::Category(category.to_string()),
                    },
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::GoToMenu,
            _ => ScreenTransition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(screen: &mut CategorySelectScreen, code: KeyCode) -> ScreenTransition {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn picks_category_for_play() {
        let mut screen =
            CategorySelectScreen::new(CategoryPurpose::Play, vec!["Networking".into(), "Web".into()]);
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Down);
        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            ScreenTransition::StartQuiz {
                category: "Web".into()
            }
        );
    }

    #[test]
    fn picks_category_leaderboard() {
        let mut screen = CategorySelectScreen::new(CategoryPurpose::Leaderboard, vec!["Web".into()]);
        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            ScreenTransition::GoToLeaderboard {
                scope: LeaderboardScope::Category("Web".into())
            }
        );
    }

    #[test]
    fn empty_list_only_goes_back() {
        let mut screen = CategorySelectScreen::new(CategoryPurpose::Play, Vec::new());
        assert_eq!(press(&mut screen, KeyCode::Down), ScreenTransition::Stay);
        assert_eq!(press(&mut screen, KeyCode::Enter), ScreenTransition::Stay);
        assert_eq!(press(&mut screen, KeyCode::Esc), ScreenTransition::GoToMenu);
    }
}
