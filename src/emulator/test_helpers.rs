//! Test doubles shared by the unit tests of this crate.
use crate::emulator::Emulator;
use crate::hardware::keyboard::KeyboardInput;
use crate::hardware::memory::Memory;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::io::Write;
use std::rc::Rc;

/// Scripted keyboard. Bytes are served in order; reading past the script is
/// an error, so a test with insufficient input fails instead of blocking.
pub struct FakeKeyboard {
    script: VecDeque<u8>,
    interrupted: bool,
}

impl FakeKeyboard {
    pub fn new(script: &str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            script: script.bytes().collect(),
            interrupted: false,
        }))
    }
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }
}

impl KeyboardInput for FakeKeyboard {
    fn byte_available(&mut self) -> io::Result<bool> {
        Ok(!self.script.is_empty())
    }
    fn read_byte(&mut self) -> io::Result<u8> {
        if self.interrupted {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        }
        self.script
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "keyboard script exhausted"))
    }
    fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}

pub struct StringWriter {
    vec: Vec<u8>,
}

impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

impl StringWriter {
    pub fn new() -> Self {
        Self {
            vec: Vec::with_capacity(120),
        }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// Memory preloaded with `words` at `origin`, keyboard permanently silent.
pub fn memory_with_words(origin: u16, words: &[u16]) -> Memory {
    let mut mem = Memory::new(FakeKeyboard::new(""));
    mem.load_words(origin, words);
    mem
}

/// Emulator around a header-less program at 0x3000, with scripted keyboard input.
pub fn emulator_with_input(program: &[u16], input: &str) -> Emulator {
    let mut emu = Emulator::with_keyboard(FakeKeyboard::new(input));
    emu.memory.load_words(0x3000, program);
    emu
}
