//! Input/output boundary between terminals and the session controller.
//!
//! - [`run_local`] drives one session on the process's own terminal.
//! - [`serve`] accepts telnet-style TCP connections, one session each.

mod local;
mod remote;
mod sink;
mod telnet;

use crossterm::event::KeyEvent;

pub use local::run_local;
pub use remote::{ServeOptions, serve, serve_on};
pub use sink::FrameSink;
pub use telnet::{MAX_HEIGHT, MAX_WIDTH, TelnetDecoder, clamp_size, negotiation};

/// Normalized input delivered to a session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press.
    Key(KeyEvent),
    /// The client's screen size changed.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// Periodic timer; only triggers a redraw.
    Tick,
}
