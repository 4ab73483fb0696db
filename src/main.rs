use clap::Parser;
use lc3_vm::emulator::{Emulator, ExitStatus};
use lc3_vm::errors::LoadError;
use lc3_vm::terminal::{self, RawWriter};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Virtual machine for LC-3 binary images.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Image files to load in order; the origin of the last one becomes the start address
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut emu = Emulator::new();
    let mut loaded = 0usize;
    for path in &args.images {
        let result = File::open(path)
            .map_err(LoadError::from)
            .and_then(|file| emu.load_image(file));
        match result {
            Ok(()) => loaded += 1,
            Err(e) => eprintln!("{}: {e}", path.display()),
        }
    }
    if loaded == 0 {
        return ExitCode::FAILURE;
    }

    let _raw = terminal::set_terminal_raw();
    let mut output = RawWriter(io::stdout());
    match emu.run(&mut output) {
        Ok(ExitStatus::Halted) => ExitCode::SUCCESS,
        Ok(ExitStatus::Interrupted) => ExitCode::from(130),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
