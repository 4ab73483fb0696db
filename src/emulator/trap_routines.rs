//! System routines invoked through the TRAP instruction.
use crate::emulator::ExitStatus;
use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::keyboard::KeyboardInput;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::cell::RefCell;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// `Continue` keeps the machine running, `Break` ends the run with either a
/// regular exit status or a fatal error.
pub type TrapFlow = ControlFlow<Result<ExitStatus, ExecutionError>>;

/// Trap vectors of the implemented system routines.
#[repr(u8)]
#[derive(enumn::N, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrapVector {
    GetC = 0x20,
    Out = 0x21,
    PutS = 0x22,
    In = 0x23,
    PutSp = 0x24,
    Halt = 0x25,
}

/// Saves the return address in R7, then runs the routine the vector selects.
/// An unrecognized vector is a fatal decode error, there are no semantics to
/// continue with.
pub fn dispatch(
    i: Instruction,
    regs: &mut Registers,
    mem: &mut Memory,
    keyboard: &RefCell<dyn KeyboardInput>,
    stdout: &mut impl Write,
) -> TrapFlow {
    regs.set(7, regs.pc());
    match TrapVector::n(i.trap_vector()) {
        Some(TrapVector::GetC) => get_c(regs, keyboard),
        Some(TrapVector::Out) => out(regs, stdout),
        Some(TrapVector::PutS) => put_s(regs, mem, stdout),
        Some(TrapVector::In) => in_trap(regs, keyboard, stdout),
        Some(TrapVector::PutSp) => put_sp(regs, mem, stdout),
        Some(TrapVector::Halt) => halt(stdout),
        None => ControlFlow::Break(Err(ExecutionError::UnknownTrapVector {
            vector: i.trap_vector(),
            address: regs.pc().wrapping_sub(1),
        })),
    }
}

fn read_character(regs: &mut Registers, keyboard: &RefCell<dyn KeyboardInput>) -> TrapFlow {
    match keyboard.borrow_mut().read_byte() {
        Ok(byte) => {
            regs.set(0, u16::from(byte));
            ControlFlow::Continue(())
        }
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {
            ControlFlow::Break(Ok(ExitStatus::Interrupted))
        }
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(regs: &mut Registers, keyboard: &RefCell<dyn KeyboardInput>) -> TrapFlow {
    read_character(regs, keyboard)
}

/// IN: Print a prompt on the screen and read a single character echoed back to the console.
///
/// The echo is this routine's job, the terminal driver never echoes.
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    keyboard: &RefCell<dyn KeyboardInput>,
    stdout: &mut impl Write,
) -> TrapFlow {
    write_str_out("Input: ", stdout)?;
    read_character(regs, keyboard)?;
    out(regs, stdout)
}

/// OUT: Write a character in R0[7:0] to the console display.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the low byte is what the trap emits"
)]
pub fn out(regs: &Registers, stdout: &mut impl Write) -> TrapFlow {
    write_bytes_out(&[(regs.get(0) & 0xFF) as u8], stdout)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the low byte is what the trap emits"
)]
fn put_one_char_per_word(word: u16, append_to: &mut Vec<u8>) {
    append_to.push((word & 0xFF) as u8);
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "both halves are deliberately cut out of the word"
)]
fn put_two_chars_per_word(word: u16, append_to: &mut Vec<u8>) {
    append_to.push((word & 0xFF) as u8);
    let second = (word >> 8) as u8;
    if second != 0 {
        append_to.push(second);
    }
}

fn put(
    regs: &Registers,
    mem: &mut Memory,
    stdout: &mut impl Write,
    handle_word: fn(u16, &mut Vec<u8>),
) -> TrapFlow {
    let mut address = regs.get(0);
    let mut bytes = Vec::with_capacity(120);
    loop {
        let word = mem.read(address);
        if word == 0 {
            break;
        }
        handle_word(word, &mut bytes);
        address = address.wrapping_add(1);
    }
    write_bytes_out(&bytes, stdout)
}

/// PUTS: print the zero-word-terminated string at the address in R0, one character per word.
pub fn put_s(regs: &Registers, mem: &mut Memory, stdout: &mut impl Write) -> TrapFlow {
    put(regs, mem, stdout, put_one_char_per_word)
}

/// PUTSP: Packed version of PUTS.
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
pub fn put_sp(regs: &Registers, mem: &mut Memory, stdout: &mut impl Write) -> TrapFlow {
    put(regs, mem, stdout, put_two_chars_per_word)
}

/// HALT: End program and stdout a message.
pub fn halt(stdout: &mut impl Write) -> TrapFlow {
    write_str_out("\nProgram halted\n", stdout)?;
    ControlFlow::Break(Ok(ExitStatus::Halted))
}

fn write_str_out(message: &str, stdout: &mut impl Write) -> TrapFlow {
    write_bytes_out(message.as_bytes(), stdout)
}

fn write_bytes_out(bytes: &[u8], stdout: &mut impl Write) -> TrapFlow {
    match stdout.write_all(bytes).and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> TrapFlow {
    ControlFlow::Break(Err(ExecutionError::Io(error.to_string())))
}
