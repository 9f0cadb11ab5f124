//! Quiz screen — renders a [`QuizSession`] and maps keys onto it.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use tracing::{debug, instrument};

use crate::session::screen::{Screen, ScreenTransition};
use crate::session::screens::chrome;
use crate::{QuizInput, QuizPhase, QuizSession, QuizStep};

/// State for the quiz screen.
#[derive(Debug, Getters)]
pub struct QuizScreen {
    session: QuizSession,
    previous_best: Option<i32>,
}

impl QuizScreen {
    /// Wraps a fresh session; `previous_best` is the player's recorded best in
    /// the same category, shown once the quiz is over.
    #[instrument(skip(session), fields(questions = session.question_count()))]
    pub fn new(session: QuizSession, previous_best: Option<i32>) -> Self {
        debug!(?previous_best, "Initializing QuizScreen");
        Self {
            session,
            previous_best,
        }
    }

    /// Maps a key to a quiz input. Escape only leaves an empty quiz.
    fn input_for(&self, key: KeyEvent) -> Option<QuizInput> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(QuizInput::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(QuizInput::MoveDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(QuizInput::Confirm),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(QuizInput::Quit),
            KeyCode::Esc if self.session.is_empty() => Some(QuizInput::Quit),
            _ => None,
        }
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);
        let notice = Paragraph::new(format!(
            "No questions available in category \"{}\".",
            self.session.category()
        ))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(notice, chunks[0]);
        frame.render_widget(chrome::help("Enter / q / Esc: Back to menu"), chunks[1]);
    }

    fn render_question(&self, frame: &mut Frame, area: Rect) {
        let Some(question) = self.session.current_question() else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(
                    u16::try_from(question.option_count())
                        .unwrap_or(u16::MAX)
                        .saturating_add(2),
                ),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let total = self.session.question_count();
        let position = *self.session.position();
        let info = Line::from(vec![
            Span::styled(
                format!(" {} ", question.category()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Score: {}/{}", self.session.correct(), self.session.answered()),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  "),
            Span::raw(format!("Question {}/{}", position + 1, total)),
        ]);
        frame.render_widget(Paragraph::new(info), chunks[0]);

        let ratio = if total == 0 {
            0.0
        } else {
            position as f64 / total as f64
        };
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio)
                .label(""),
            chunks[1],
        );

        let prompt = Paragraph::new(question.text())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Question"));
        frame.render_widget(prompt, chunks[2]);

        let submitted = match self.session.phase() {
            QuizPhase::ShowingResult { submitted } => Some(*submitted),
            _ => None,
        };
        let lines: Vec<Line> = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let letter = (b'A' + (i % 26) as u8) as char;
                let text = format!("{}) {}", letter, option);
                match submitted {
                    Some(_) if question.is_correct(i) => Line::styled(
                        format!("  {} ✓", text),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Some(s) if s == i => {
                        Line::styled(format!("  {} ✗", text), Style::default().fg(Color::Red))
                    }
                    Some(_) => Line::raw(format!("  {}", text)),
                    None if i == *self.session.cursor() => Line::styled(
                        format!("> {}", text),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    None => Line::raw(format!("  {}", text)),
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Answers")),
            chunks[3],
        );

        if let Some(s) = submitted {
            let feedback = if question.is_correct(s) {
                Line::styled("Correct!", Style::default().fg(Color::Green))
            } else {
                Line::styled("Wrong answer!", Style::default().fg(Color::Red))
            };
            frame.render_widget(
                Paragraph::new(feedback).alignment(Alignment::Center),
                chunks[4],
            );
            frame.render_widget(chrome::help("Enter: Next question | q: Quit"), chunks[5]);
        } else {
            frame.render_widget(
                chrome::help("↑↓ / j k: Navigate | Enter: Answer | q: Quit"),
                chunks[5],
            );
        }
    }

    fn render_finished(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(3)])
            .split(area);

        let correct = *self.session.correct();
        let total = self.session.question_count();
        let percentage = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        let color = if percentage >= 80.0 {
            Color::Green
        } else if percentage >= 50.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        let encouragement = if correct == total {
            "Perfect! You are an expert!"
        } else if percentage >= 80.0 {
            "Excellent work!"
        } else if percentage >= 50.0 {
            "Not bad, keep it up!"
        } else {
            "Keep practicing!"
        };

        let mut lines = vec![
            Line::styled(
                "Quiz complete!",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled(
                format!("Final score: {}/{} ({:.1}%)", correct, total, percentage),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Line::raw(format!("Category: {}", self.session.category())),
        ];
        if let Some(best) = self.previous_best {
            lines.push(Line::raw(format!("Previous best: {}", best)));
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw(encouragement));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );
        frame.render_widget(chrome::help("Enter / q: Back to menu"), chunks[1]);
    }
}

impl Screen for QuizScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(frame.area());
        frame.render_widget(chrome::title(chrome::BANNER), chunks[0]);

        if self.session.is_empty() {
            self.render_empty(frame, chunks[1]);
        } else if *self.session.phase() == QuizPhase::Finished {
            self.render_finished(frame, chunks[1]);
        } else {
            self.render_question(frame, chunks[1]);
        }
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        let Some(input) = self.input_for(key) else {
            return ScreenTransition::Stay;
        };
        match self.session.handle(input) {
            QuizStep::Continue => ScreenTransition::Stay,
            QuizStep::Completed(score) => ScreenTransition::QuizFinished(score),
            QuizStep::Aborted => ScreenTransition::Quit,
            QuizStep::Exited => ScreenTransition::GoToMenu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(category: &str) -> QuizScreen {
        let bank = crate::QuestionBank::defaults();
        let mut rng = StdRng::seed_from_u64(3);
        let session = QuizSession::new(
            "amy".into(),
            category.into(),
            &bank.for_category(category),
            &mut rng,
        );
        QuizScreen::new(session, Some(2))
    }

    fn press(screen: &mut QuizScreen, code: KeyCode) -> ScreenTransition {
        screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn rendered(screen: &QuizScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
        terminal.draw(|f| screen.render(f)).expect("draw");
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn keys_drive_the_session() {
        let mut quiz = screen("Web");
        assert_eq!(press(&mut quiz, KeyCode::Char('j')), ScreenTransition::Stay);
        assert_eq!(*quiz.session().cursor(), 1);
        assert_eq!(press(&mut quiz, KeyCode::Enter), ScreenTransition::Stay);
        assert!(matches!(
            quiz.session().phase(),
            QuizPhase::ShowingResult { submitted: 1 }
        ));
        assert_eq!(press(&mut quiz, KeyCode::Enter), ScreenTransition::Stay);
        assert!(matches!(
            press(&mut quiz, KeyCode::Enter),
            ScreenTransition::QuizFinished(_)
        ));
    }

    #[test]
    fn q_mid_quiz_ends_the_session() {
        let mut quiz = screen("Web");
        assert_eq!(press(&mut quiz, KeyCode::Char('q')), ScreenTransition::Quit);
    }

    #[test]
    fn empty_quiz_shows_notice_and_returns_to_menu() {
        let mut quiz = screen("Forensics");
        assert!(rendered(&quiz).contains("No questions available"));
        assert_eq!(press(&mut quiz, KeyCode::Down), ScreenTransition::Stay);
        assert_eq!(press(&mut quiz, KeyCode::Esc), ScreenTransition::GoToMenu);
    }

    #[test]
    fn result_view_marks_the_correct_answer() {
        let mut quiz = screen("Web");
        press(&mut quiz, KeyCode::Enter);
        let text = rendered(&quiz);
        assert!(text.contains("Cross-Site Scripting ✓"));
    }

    #[test]
    fn huge_option_list_renders() {
        let options: Vec<String> = (0..70_000).map(|i| format!("Option {i}")).collect();
        let question = crate::Question::new(1, "Bulk".into(), "Pick one".into(), options, 0);
        let mut rng = StdRng::seed_from_u64(3);
        let session = QuizSession::new("amy".into(), "Bulk".into(), &[question], &mut rng);
        let quiz = QuizScreen::new(session, None);
        assert!(rendered(&quiz).contains("Pick one"));
    }

    #[test]
    fn finished_view_shows_score_and_previous_best() {
        let mut quiz = screen("Web");
        press(&mut quiz, KeyCode::Enter);
        press(&mut quiz, KeyCode::Enter);
        let text = rendered(&quiz);
        assert!(text.contains("Final score:"));
        assert!(text.contains("Previous best: 2"));
    }
}
