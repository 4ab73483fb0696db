//! The fetch-decode-execute machinery and the public [`Emulator`].
pub(crate) mod instruction;
pub(crate) mod opcodes;
pub(crate) mod trap_routines;
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::emulator::instruction::Instruction;
use crate::emulator::opcodes::Opcode;
use crate::emulator::trap_routines::TrapFlow;
use crate::errors::{ExecutionError, LoadError};
use crate::hardware::keyboard::{KeyboardInput, TerminalInput};
use crate::hardware::memory::Memory;
use crate::hardware::registers::{DEFAULT_PC_START, Registers};
use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Write};
use std::ops::ControlFlow;
use std::path::Path;
use std::rc::Rc;

/// Reads the image file at `path` into a fresh machine.
///
/// # Errors
/// - the file cannot be opened or read
/// - the image is shorter than one word or ends mid-word
pub fn from_image(path: impl AsRef<Path>) -> Result<Emulator, LoadError> {
    let mut emu = Emulator::new();
    emu.load_image(File::open(path)?)?;
    Ok(emu)
}

/// Builds a machine from an already-decoded image: `image[0]` is the origin
/// address, the remaining words are the program.
///
/// # Errors
/// - the image is empty
pub fn from_image_words(image: &[u16]) -> Result<Emulator, LoadError> {
    let Some((origin, words)) = image.split_first() else {
        return Err(LoadError::MissingOrigin);
    };
    let mut emu = Emulator::new();
    emu.memory.load_words(*origin, words);
    emu.relocate(*origin);
    Ok(emu)
}

/// How a run ended. Fatal conditions are reported as [`ExecutionError`] instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// The program executed the HALT trap.
    Halted,
    /// CTRL-C arrived through the keyboard collaborator.
    Interrupted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum MachineState {
    Running,
    Halted,
}

/// One LC-3 machine instance: memory, register file and keyboard handle.
/// Instances are independent, nothing is shared between two of them.
pub struct Emulator {
    registers: Registers,
    memory: Memory,
    keyboard: Rc<RefCell<dyn KeyboardInput>>,
    state: MachineState,
    start_pc: u16,
}

impl std::fmt::Debug for Emulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("state", &self.state)
            .field("start_pc", &self.start_pc)
            .finish_non_exhaustive()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    /// A machine wired to the controlling terminal's keyboard.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keyboard(Rc::new(RefCell::new(TerminalInput::new())))
    }

    /// A machine with a caller-supplied keyboard, for tests and embedders.
    #[must_use]
    pub fn with_keyboard(keyboard: Rc<RefCell<dyn KeyboardInput>>) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(Rc::clone(&keyboard)),
            keyboard,
            state: MachineState::Running,
            start_pc: DEFAULT_PC_START,
        }
    }

    /// Loads one big-endian program image. Images load on top of each other;
    /// the origin of the last one loaded becomes the start address.
    ///
    /// # Errors
    /// - the stream cannot be read, is shorter than one word or ends mid-word
    pub fn load_image(&mut self, image: impl Read) -> Result<(), LoadError> {
        let origin = self.memory.load_image(image)?;
        self.relocate(origin);
        Ok(())
    }

    fn relocate(&mut self, origin: u16) {
        self.start_pc = origin;
        self.registers.set_pc(origin);
    }

    /// Puts the register file back into its power-on state with the program
    /// counter at the start address, so a loaded image can run again.
    pub fn reset_registers(&mut self) {
        self.registers = Registers::new();
        self.registers.set_pc(self.start_pc);
        self.state = MachineState::Running;
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Runs until the program halts, CTRL-C arrives or a fatal error occurs.
    /// Program output goes to `output` in exactly the order it was emitted.
    ///
    /// # Errors
    /// - the program executed a TRAP with an unrecognized vector
    /// - reading keyboard input or writing program output failed
    pub fn run(&mut self, output: &mut impl Write) -> Result<ExitStatus, ExecutionError> {
        while self.state == MachineState::Running {
            if self.keyboard.borrow().is_interrupted() {
                self.state = MachineState::Halted;
                return Ok(ExitStatus::Interrupted);
            }
            let instruction = Instruction::from(self.memory.read(self.registers.pc()));
            self.registers.advance_pc();
            if let ControlFlow::Break(outcome) = self.step(instruction, output) {
                self.state = MachineState::Halted;
                return outcome;
            }
        }
        Ok(ExitStatus::Halted)
    }

    /// Decodes and executes one already-fetched instruction.
    fn step(&mut self, i: Instruction, output: &mut impl Write) -> TrapFlow {
        let opcode = Opcode::n(i.op_code()).expect("a masked 4-bit opcode always decodes");
        match opcode {
            Opcode::Add => opcodes::add(i, &mut self.registers),
            Opcode::And => opcodes::and(i, &mut self.registers),
            Opcode::Not => opcodes::not(i, &mut self.registers),
            Opcode::Br => opcodes::br(i, &mut self.registers),
            Opcode::Jmp => opcodes::jmp_or_ret(i, &mut self.registers),
            Opcode::Jsr => opcodes::jsr(i, &mut self.registers),
            Opcode::Ld => opcodes::ld(i, &mut self.registers, &mut self.memory),
            Opcode::Ldi => opcodes::ldi(i, &mut self.registers, &mut self.memory),
            Opcode::Ldr => opcodes::ldr(i, &mut self.registers, &mut self.memory),
            Opcode::Lea => opcodes::lea(i, &mut self.registers),
            Opcode::St => opcodes::st(i, &self.registers, &mut self.memory),
            Opcode::Sti => opcodes::sti(i, &self.registers, &mut self.memory),
            Opcode::Str => opcodes::str(i, &self.registers, &mut self.memory),
            Opcode::Trap => {
                return trap_routines::dispatch(
                    i,
                    &mut self.registers,
                    &mut self.memory,
                    &self.keyboard,
                    output,
                );
            }
            // the architecture defines no behavior for these two
            Opcode::Rti | Opcode::Res => {}
        }
        ControlFlow::Continue(())
    }
}
