//! Identity screen — the player types a display name before anything else.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::session::screen::{Screen, ScreenTransition};
use crate::session::screens::chrome;

/// Shortest accepted display name, in characters, after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// Longest display name the input field accepts, in characters.
pub const MAX_NAME_LEN: usize = 20;

/// Validates a typed display name, returning the trimmed name.
///
/// # Errors
///
/// Returns a message suitable for re-prompting when the name is too short.
#[instrument]
pub fn validate_display_name(input: &str) -> Result<String, String> {
    let name = input.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(format!(
            "Your name must be at least {} characters long",
            MIN_NAME_LEN
        ));
    }
    Ok(name.to_string())
}

/// State for the identity screen.
#[derive(Debug, Default, Getters)]
pub struct IdentityScreen {
    input: String,
    error_message: Option<String>,
}

impl IdentityScreen {
    /// Creates an empty identity prompt.
    #[instrument]
    pub fn new() -> Self {
        debug!("Initializing IdentityScreen");
        Self::default()
    }
}

impl Screen for IdentityScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        frame.render_widget(chrome::title(chrome::BANNER), chunks[0]);

        let welcome = Paragraph::new("Welcome to the cybersecurity quiz!\nEnter your name to begin.")
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center);
        frame.render_widget(welcome, chunks[1]);

        let input = Paragraph::new(self.input.as_str())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Name ({}-{} characters)", MIN_NAME_LEN, MAX_NAME_LEN)),
            );
        frame.render_widget(input, chunks[2]);

        if let Some(error) = &self.error_message {
            let error = Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            frame.render_widget(error, chunks[3]);
        }

        frame.render_widget(chrome::help("Enter: Confirm | Esc / Ctrl-C: Quit"), chunks[5]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if self.input.chars().count() < MAX_NAME_LEN {
                    self.input.push(c);
                }
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.input.pop();
                ScreenTransition::Stay
            }
            KeyCode::Enter => match validate_display_name(&self.input) {
                Ok(player) => {
                    info!(player = %player, "Display name accepted");
                    self.error_message = None;
                    ScreenTransition::IdentityConfirmed { player }
                }
                Err(message) => {
                    debug!(input = %self.input, "Display name rejected");
                    self.error_message = Some(message);
                    ScreenTransition::Stay
                }
            },
            KeyCode::Esc => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
