//! Leaderboard screen — ranked standings for one scope.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{debug, info, instrument};

use crate::session::screen::{Screen, ScreenTransition};
use crate::session::screens::chrome;
use crate::{LeaderboardEntry, LeaderboardScope, ScoreboardStats};

/// State for the leaderboard screen. Data is loaded by the controller.
#[derive(Debug, Getters)]
pub struct LeaderboardScreen {
    player: String,
    scope: LeaderboardScope,
    entries: Vec<LeaderboardEntry>,
    stats: Option<ScoreboardStats>,
}

impl LeaderboardScreen {
    /// Creates a leaderboard screen over already-computed entries.
    #[instrument(skip(entries, stats), fields(entries = entries.len()))]
    pub fn new(
        player: String,
        scope: LeaderboardScope,
        entries: Vec<LeaderboardEntry>,
        stats: Option<ScoreboardStats>,
    ) -> Self {
        debug!(scope = %scope, "Initializing LeaderboardScreen");
        Self {
            player,
            scope,
            entries,
            stats,
        }
    }

    fn heading(&self) -> String {
        match &self.scope {
            LeaderboardScope::Global => "Global Leaderboard".to_string(),
            LeaderboardScope::Category(category) => format!("Leaderboard — {}", category),
        }
    }
}

impl Screen for LeaderboardScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let heading = self.heading();
        frame.render_widget(chrome::title(&heading), chunks[0]);

        let summary = match &self.stats {
            Some(stats) if !self.entries.is_empty() => {
                format!("Signed in as {}   {}", self.player, stats)
            }
            _ => format!("Signed in as {}", self.player),
        };
        let summary = Paragraph::new(summary)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(summary, chunks[1]);

        if self.entries.is_empty() {
            let empty = Paragraph::new("No scores recorded yet.\nBe the first to play!")
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[2]);
        } else {
            let header = Row::new(vec![
                Cell::from("Rank").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from("Player").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from("Score").style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from("Success").style(Style::default().add_modifier(Modifier::BOLD)),
            ])
            .style(Style::default().fg(Color::Yellow));

            let rows: Vec<Row> = self
                .entries
                .iter()
                .map(|entry| {
                    let mut style = if *entry.rank() <= 3 {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    if *entry.player() == self.player {
                        style = style.fg(Color::Magenta).add_modifier(Modifier::BOLD);
                    }
                    Row::new(vec![
                        Cell::from(format!("#{}", entry.rank())),
                        Cell::from(entry.player().as_str()),
                        Cell::from(format!("{}/{}", entry.measure(), entry.total())),
                        Cell::from(format!("{:.1}%", entry.percentage())),
                    ])
                    .style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(6),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
                Constraint::Percentage(20),
            ];
            let table = Table::new(rows, widths)
                .header(header)
                .block(Block::default().borders(Borders::ALL).title("Standings"));
            frame.render_widget(table, chunks[2]);
        }

        frame.render_widget(chrome::help("Enter / Esc / q: Back to menu"), chunks[3]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Enter
            | KeyCode::Esc
            | KeyCode::Char(' ')
            | KeyCode::Char('q')
            | KeyCode::Char('Q')
            | KeyCode::Char('b') => {
                info!("Returning to menu from leaderboard");
                ScreenTransition::GoToMenu
            }
            _ => ScreenTransition::Stay,
        }
    }
}
