use crossterm::event::{KeyCode, KeyModifiers, poll, read};
use std::io;
use std::time::Duration;

/// Keyboard input decoupled from the terminal, so the machine can be driven by fakes.
///
/// The status check and the blocking read are two distinct capabilities: memory-mapped
/// polling must never stall a fetch, while the read traps block the whole machine.
pub trait KeyboardInput {
    /// Zero-timeout check for a pending byte. A `true` result latches the byte,
    /// and the next `read_byte` returns it without blocking.
    ///
    /// # Errors
    /// - the underlying event source failed to poll
    fn byte_available(&mut self) -> io::Result<bool>;
    /// Blocks until a byte arrives. `ErrorKind::Interrupted` reports CTRL-C.
    ///
    /// # Errors
    /// - the underlying event source failed to read
    fn read_byte(&mut self) -> io::Result<u8>;
    /// True once CTRL-C was seen.
    fn is_interrupted(&self) -> bool;
}

/// [`KeyboardInput`] reading raw key events from the controlling terminal.
pub struct TerminalInput {
    pending: Option<u8>,
    interrupted: bool,
}

impl TerminalInput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            interrupted: false,
        }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardInput for TerminalInput {
    fn byte_available(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if poll(Duration::ZERO)?
            && let Some(event) = read()?.as_key_press_event()
        {
            if event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL {
                self.interrupted = true;
            } else if let Some(byte) = key_byte(event.code) {
                self.pending = Some(byte);
                return Ok(true);
            }
        }
        Ok(false)
    }
    fn read_byte(&mut self) -> io::Result<u8> {
        loop {
            if let Some(byte) = self.pending.take() {
                return Ok(byte);
            }
            if self.interrupted {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "CTRL-C"));
            }
            if let Some(event) = read()?.as_key_press_event() {
                if event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL {
                    self.interrupted = true;
                } else {
                    self.pending = key_byte(event.code);
                }
            }
        }
    }
    fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}

/// Key events the machine consumes as bytes. Enter arrives as a newline,
/// keys outside the single-byte range are dropped.
fn key_byte(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Backspace => Some(0x08),
        _ => code.as_char().and_then(|c| u8::try_from(c).ok()),
    }
}
