//! TCP server speaking just enough telnet to run full-screen sessions.
//!
//! Every connection gets its own task and its own [`SessionController`]; the
//! only shared state is the read-only question bank and the scoreboard.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use derive_getters::Getters;
use derive_new::new;
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend, layout::Rect};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument, warn};

use crate::session::SessionControl;
use crate::transport::{FrameSink, InputEvent, TelnetDecoder, clamp_size, negotiation};
use crate::{QuestionBank, QuizConfig, ScoreRepository, SessionController, SessionSettings};

const READ_BUFFER: usize = 1024;

/// Everything the server needs besides the listener address.
#[derive(Debug, Clone, Getters, new)]
pub struct ServeOptions {
    /// Address to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Screen size assumed until a client reports its own.
    initial_size: (u16, u16),
    /// Per-session knobs.
    settings: SessionSettings,
}

impl From<&QuizConfig> for ServeOptions {
    fn from(config: &QuizConfig) -> Self {
        Self::new(
            config.host().clone(),
            *config.port(),
            (*config.screen_width(), *config.screen_height()),
            SessionSettings::from(config),
        )
    }
}

/// Accepts connections until the process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
#[instrument(skip(questions, repository))]
pub async fn serve(
    options: ServeOptions,
    questions: Arc<QuestionBank>,
    repository: ScoreRepository,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((options.host.as_str(), options.port)).await?;
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    serve_on(listener, options, questions, repository, ctrl_c).await
}

/// Accepts connections on an already bound listener until `shutdown`
/// completes. Sessions already running are left to finish on their own.
///
/// # Errors
///
/// Returns an error if the listener's local address cannot be read.
#[instrument(skip_all)]
pub async fn serve_on(
    listener: TcpListener,
    options: ServeOptions,
    questions: Arc<QuestionBank>,
    repository: ScoreRepository,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Quiz server listening");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, "Client connected");
                    let controller = SessionController::new(
                        Arc::clone(&questions),
                        repository.clone(),
                        options.settings,
                    );
                    let size = options.initial_size;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, controller, size).await {
                            warn!(%peer, error = %e, "Connection ended with error");
                        }
                        info!(%peer, "Client disconnected");
                    });
                }
                Err(e) => error!(error = %e, "Failed to accept connection"),
            },
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
    Ok(())
}

/// Runs one session over a socket until the player quits or disconnects.
#[instrument(skip(stream, controller))]
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    mut controller: SessionController,
    initial_size: (u16, u16),
) -> anyhow::Result<()> {
    let (width, height) = clamp_size(initial_size.0, initial_size.1);
    let (mut reader, mut writer) = stream.into_split();
    writer.write_all(&negotiation()).await?;

    let sink = FrameSink::new();
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(sink.clone()),
        TerminalOptions {
            viewport: Viewport::Fixed(Rect::new(0, 0, width, height)),
        },
    )?;
    execute!(
        terminal.backend_mut(),
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All)
    )?;
    terminal.draw(|f| controller.render(f))?;
    send(&sink, &mut writer).await?;

    let mut decoder = TelnetDecoder::new();
    let mut buf = [0u8; READ_BUFFER];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            debug!("Peer closed the connection");
            return Ok(());
        }

        for event in decoder.feed(&buf[..n]) {
            if let InputEvent::Resize { width, height } = event {
                let (width, height) = clamp_size(width, height);
                terminal.resize(Rect::new(0, 0, width, height))?;
            }
            // Score writes and leaderboard reads block on SQLite.
            let control = tokio::task::block_in_place(|| controller.handle_event(event));
            if control == SessionControl::Terminate {
                execute!(
                    terminal.backend_mut(),
                    Clear(ClearType::All),
                    Show,
                    LeaveAlternateScreen
                )?;
                send(&sink, &mut writer).await?;
                writer.write_all(b"Thanks for playing!\r\n").await?;
                writer.shutdown().await?;
                info!(player = ?controller.player(), "Session terminated");
                return Ok(());
            }
        }

        terminal.draw(|f| controller.render(f))?;
        send(&sink, &mut writer).await?;
    }
}

/// Writes the rendered bytes to the socket.
async fn send(sink: &FrameSink, writer: &mut OwnedWriteHalf) -> std::io::Result<()> {
    let bytes = sink.take();
    if !bytes.is_empty() {
        writer.write_all(&bytes).await?;
        writer.flush().await?;
    }
    Ok(())
}
