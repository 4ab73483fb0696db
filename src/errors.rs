use thiserror::Error;

/// Failures while reading a program image into memory.
///
/// Load errors are local to the image that caused them. Words already written
/// stay in memory, and the caller decides whether to keep loading other images.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read program image: {0}")]
    Io(#[from] std::io::Error),
    #[error("program image is missing its origin word")]
    MissingOrigin,
    #[error("program image ends in the middle of a word")]
    TruncatedWord,
}

/// Fatal conditions during execution. The machine halts, there is no recovery path.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("unrecognized trap vector 0x{vector:02X} at address 0x{address:04X}")]
    UnknownTrapVector { vector: u8, address: u16 },
    #[error("error reading keyboard input or writing program output: {0}")]
    Io(String),
}
