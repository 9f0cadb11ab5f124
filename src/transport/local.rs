//! Local terminal driver.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::SessionController;
use crate::session::SessionControl;
use crate::transport::InputEvent;

/// How long to wait for input before emitting a [`InputEvent::Tick`].
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs one session on this process's terminal until the player quits.
///
/// Sets up raw mode and the alternate screen, and restores the terminal on
/// exit even when the loop fails.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to, or read from.
#[instrument(skip(controller))]
pub fn run_local(mut controller: SessionController) -> anyhow::Result<()> {
    info!("Starting local session");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = drive(&mut terminal, &mut controller);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = ?e, "Local session failed");
    }
    info!(player = ?controller.player(), "Local session ended");
    result
}

/// Draw/poll loop.
fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut SessionController,
) -> anyhow::Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| controller.render(f))?;

        let input = if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => InputEvent::Key(key),
                Event::Resize(width, height) => InputEvent::Resize { width, height },
                _ => continue,
            }
        } else {
            InputEvent::Tick
        };

        if controller.handle_event(input) == SessionControl::Terminate {
            return Ok(());
        }
    }
}
