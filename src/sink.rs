use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// An output stream a console can write to
pub trait Sink: Write + Send {
    /// Whether the stream is attached to an interactive terminal
    fn is_terminal(&self) -> bool {
        false
    }
}

impl Sink for io::Stdout {
    fn is_terminal(&self) -> bool {
        is_terminal::IsTerminal::is_terminal(self)
    }
}

impl Sink for io::Stderr {
    fn is_terminal(&self) -> bool {
        is_terminal::IsTerminal::is_terminal(self)
    }
}

impl Sink for std::fs::File {
    fn is_terminal(&self) -> bool {
        is_terminal::IsTerminal::is_terminal(self)
    }
}

impl Sink for Vec<u8> {}

impl Sink for io::Sink {}

/// In-memory stream whose clones share one buffer.
///
/// Hand one clone to a console and keep another to read back what was written.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
    terminal: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that claims to be a terminal
    pub fn terminal() -> Self {
        MemorySink {
            buffer: Arc::default(),
            terminal: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn is_terminal(&self) -> bool {
        self.terminal
    }
}
