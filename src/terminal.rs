use crossterm::terminal;
use std::io;
use std::io::Write;

pub struct RawLock {}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Error resetting terminal {e}");
        }
    }
}

/// Set terminal to raw in best-effort mode, only log on failure, since it does not work for
/// cargo doc tests and disabling does not work because of a
/// [rust issue](https://github.com/rust-lang/rust/issues/67295).
pub fn set_terminal_raw() -> RawLock {
    if let Err(e) = terminal::enable_raw_mode() {
        eprintln!("Could not set terminal to raw mode: {e}");
    }
    RawLock {}
}

/// Rewrites bare `\n` to `\r\n`. Raw mode switches the terminal's own output
/// processing off, so program output would otherwise stairstep across the screen.
pub struct RawWriter<W: Write>(pub W);

impl<W: Write> Write for RawWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut parts = buf.split(|&byte| byte == b'\n');
        if let Some(first) = parts.next() {
            self.0.write_all(first)?;
        }
        for part in parts {
            self.0.write_all(b"\r\n")?;
            self.0.write_all(part)?;
        }
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_raw_writer_inserts_carriage_returns() {
        let mut writer = RawWriter(Vec::new());
        writer.write_all(b"one\ntwo\n").unwrap();
        expect_that!(writer.0.as_slice(), eq(b"one\r\ntwo\r\n".as_slice()));
    }
    #[gtest]
    pub fn test_raw_writer_passes_plain_output_through() {
        let mut writer = RawWriter(Vec::new());
        writer.write_all(b"no newline").unwrap();
        expect_that!(writer.0.as_slice(), eq(b"no newline".as_slice()));
    }
}
