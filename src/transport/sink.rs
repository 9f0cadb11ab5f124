//! In-memory byte sink that a ratatui backend renders into.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared buffer collecting the ANSI output of one frame.
///
/// Clones share the same buffer: hand one to `CrosstermBackend` and keep
/// another to [`FrameSink::take`] the bytes after each draw.
#[derive(Debug, Clone, Default)]
pub struct FrameSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl FrameSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything written so far.
    pub fn take(&self) -> Vec<u8> {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *buffer)
    }
}

impl Write for FrameSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_and_take_drains() {
        let sink = FrameSink::new();
        let mut writer = sink.clone();
        writer.write_all(b"\x1b[2J").expect("write");
        writer.write_all(b"hi").expect("write");
        assert_eq!(sink.take(), b"\x1b[2Jhi".to_vec());
        assert!(sink.take().is_empty());
    }
}
