//! Byte-level decoder for telnet clients in character mode.
//!
//! Handles telnet commands (IAC sequences), NAWS window-size reports, ANSI
//! cursor keys, CR/LF pairs, Backspace/Delete, Ctrl-C and UTF-8 text.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, instrument, trace};

use crate::transport::InputEvent;

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

const OPT_ECHO: u8 = 1;
const OPT_SGA: u8 = 3;
const OPT_NAWS: u8 = 31;

const ESC: u8 = 0x1b;

/// Largest screen a client may report; bigger NAWS values are clamped.
pub const MAX_WIDTH: u16 = 500;
/// Tallest screen a client may report.
pub const MAX_HEIGHT: u16 = 200;

/// Longest CSI parameter run kept before the sequence is discarded.
const MAX_CSI_PARAMS: usize = 16;
/// Longest subnegotiation payload kept before it is discarded.
const MAX_SUBNEGOTIATION: usize = 64;

/// Clamps a reported screen size to `1..=MAX_WIDTH` x `1..=MAX_HEIGHT`.
pub fn clamp_size(width: u16, height: u16) -> (u16, u16) {
    (width.clamp(1, MAX_WIDTH), height.clamp(1, MAX_HEIGHT))
}

/// Bytes sent on connect: the server echoes, suppresses go-ahead, and asks
/// the client to report its window size.
pub fn negotiation() -> [u8; 9] {
    [
        IAC, WILL, OPT_ECHO, //
        IAC, WILL, OPT_SGA, //
        IAC, DO, OPT_NAWS,
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Data,
    /// Just saw CR; a following LF or NUL belongs to it.
    CarriageReturn,
    Iac,
    /// Option byte of WILL/WONT/DO/DONT.
    Negotiate,
    Subnegotiation,
    SubnegotiationIac,
    Escape,
    Csi(Vec<u8>),
    /// Overlong CSI sequence; skipped up to its final byte.
    SkipCsi,
    Ss3,
}

/// Incremental decoder; feed it whatever the socket returns.
#[derive(Debug)]
pub struct TelnetDecoder {
    state: State,
    subnegotiation: Vec<u8>,
    /// Set when the current subnegotiation outgrew its buffer.
    subnegotiation_overflow: bool,
    utf8: Vec<u8>,
}

impl Default for TelnetDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelnetDecoder {
    /// Creates a decoder in the plain-data state.
    pub fn new() -> Self {
        Self {
            state: State::Data,
            subnegotiation: Vec::new(),
            subnegotiation_overflow: false,
            utf8: Vec::new(),
        }
    }

    /// Decodes a chunk of bytes into input events.
    ///
    /// A lone ESC at the end of a chunk is reported as the Escape key, since
    /// clients send escape sequences in a single write.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for &byte in bytes {
            self.push(byte, &mut events);
        }
        if self.state == State::Escape {
            self.state = State::Data;
            events.push(key(KeyCode::Esc));
        }
        trace!(events = events.len(), "Decoded chunk");
        events
    }

    fn push(&mut self, byte: u8, events: &mut Vec<InputEvent>) {
        match std::mem::replace(&mut self.state, State::Data) {
            State::Data => self.data(byte, events),
            State::CarriageReturn => {
                if byte != b'\n' && byte != 0 {
                    self.data(byte, events);
                }
            }
            State::Iac => match byte {
                WILL | WONT | DO | DONT => self.state = State::Negotiate,
                SB => {
                    self.subnegotiation.clear();
                    self.subnegotiation_overflow = false;
                    self.state = State::Subnegotiation;
                }
                _ => {}
            },
            State::Negotiate => {}
            State::Subnegotiation => {
                if byte == IAC {
                    self.state = State::SubnegotiationIac;
                } else {
                    self.push_subnegotiation(byte);
                    self.state = State::Subnegotiation;
                }
            }
            State::SubnegotiationIac => match byte {
                SE => self.finish_subnegotiation(events),
                IAC => {
                    self.push_subnegotiation(IAC);
                    self.state = State::Subnegotiation;
                }
                _ => self.state = State::Subnegotiation,
            },
            State::Escape => match byte {
                b'[' => self.state = State::Csi(Vec::new()),
                b'O' => self.state = State::Ss3,
                ESC => {
                    events.push(key(KeyCode::Esc));
                    self.state = State::Escape;
                }
                _ => {
                    events.push(key(KeyCode::Esc));
                    self.data(byte, events);
                }
            },
            State::Csi(mut params) => match byte {
                0x30..=0x3f if params.len() >= MAX_CSI_PARAMS => {
                    debug!("Discarding overlong escape sequence");
                    self.state = State::SkipCsi;
                }
                0x30..=0x3f => {
                    params.push(byte);
                    self.state = State::Csi(params);
                }
                0x20..=0x2f => self.state = State::Csi(params),
                _ => {
                    if let Some(code) = csi_key(byte, &params) {
                        events.push(key(code));
                    }
                }
            },
            State::SkipCsi => {
                if (0x20..=0x3f).contains(&byte) {
                    self.state = State::SkipCsi;
                }
            }
            State::Ss3 => {
                if let Some(code) = csi_key(byte, &[]) {
                    events.push(key(code));
                }
            }
        }
    }

    fn data(&mut self, byte: u8, events: &mut Vec<InputEvent>) {
        match byte {
            IAC => self.state = State::Iac,
            ESC => self.state = State::Escape,
            b'\r' => {
                events.push(key(KeyCode::Enter));
                self.state = State::CarriageReturn;
            }
            b'\n' => events.push(key(KeyCode::Enter)),
            0x08 | 0x7f => events.push(key(KeyCode::Backspace)),
            b'\t' => events.push(key(KeyCode::Tab)),
            0x01..=0x1a => {
                let letter = (b'a' + byte - 1) as char;
                events.push(InputEvent::Key(KeyEvent::new(
                    KeyCode::Char(letter),
                    KeyModifiers::CONTROL,
                )));
            }
            0x20..=0x7e => events.push(key(KeyCode::Char(byte as char))),
            0x80..=0xff => self.utf8_byte(byte, events),
            _ => {}
        }
    }

    fn utf8_byte(&mut self, byte: u8, events: &mut Vec<InputEvent>) {
        if byte & 0xc0 != 0x80 {
            self.utf8.clear();
        }
        self.utf8.push(byte);
        let expected = match self.utf8[0] {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => {
                self.utf8.clear();
                return;
            }
        };
        if self.utf8.len() < expected {
            return;
        }
        if let Ok(text) = std::str::from_utf8(&self.utf8) {
            events.extend(text.chars().map(|c| key(KeyCode::Char(c))));
        }
        self.utf8.clear();
    }

    fn push_subnegotiation(&mut self, byte: u8) {
        if self.subnegotiation.len() < MAX_SUBNEGOTIATION {
            self.subnegotiation.push(byte);
        } else if !self.subnegotiation_overflow {
            debug!("Discarding overlong subnegotiation");
            self.subnegotiation_overflow = true;
        }
    }

    fn finish_subnegotiation(&mut self, events: &mut Vec<InputEvent>) {
        if self.subnegotiation_overflow {
            self.subnegotiation_overflow = false;
            self.subnegotiation.clear();
            return;
        }
        if let [OPT_NAWS, w_hi, w_lo, h_hi, h_lo, ..] = self.subnegotiation[..] {
            let width = u16::from_be_bytes([w_hi, w_lo]);
            let height = u16::from_be_bytes([h_hi, h_lo]);
            debug!(width, height, "Client reported window size");
            if width > 0 && height > 0 {
                let (width, height) = clamp_size(width, height);
                events.push(InputEvent::Resize { width, height });
            }
        }
        self.subnegotiation.clear();
    }
}

fn key(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn csi_key(final_byte: u8, params: &[u8]) -> Option<KeyCode> {
    match (final_byte, params) {
        (b'A', _) => Some(KeyCode::Up),
        (b'B', _) => Some(KeyCode::Down),
        (b'C', _) => Some(KeyCode::Right),
        (b'D', _) => Some(KeyCode::Left),
        (b'H', _) => Some(KeyCode::Home),
        (b'F', _) => Some(KeyCode::End),
        (b'~', [b'3']) => Some(KeyCode::Delete),
        _ => None,
    }
}
