//! # LC-3 virtual machine.
//!
//! `lc3-vm` executes binary images compiled for the LC-3, a 16-bit educational
//! CPU. Images are big-endian word streams whose first word names the load
//! origin; execution starts there and runs until the program halts.
//!
//! # Example
//! ```
//! use lc3_vm::emulator::{self, ExitStatus};
//!
//! // ADD R1, R1, #7 then HALT
//! let mut emu = emulator::from_image_words(&[0x3000, 0x1267, 0xF025]).unwrap();
//! let mut output = Vec::new();
//! let status = emu.run(&mut output).unwrap();
//! assert_eq!(status, ExitStatus::Halted);
//! assert_eq!(emu.registers().get(1), 7);
//! ```
//! # Errors
//! - [`errors::LoadError`] while reading an image
//! - [`errors::ExecutionError`] for the fatal conditions of a run

pub mod emulator;
pub mod errors;
pub mod hardware;
pub(crate) mod numbers;
pub mod terminal;
