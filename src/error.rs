use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Bitstream errors
    #[error("Out of data: requested {requested} bits, only {remaining} remaining")]
    OutOfData { requested: u8, remaining: usize },

    #[error("Malformed compressed stream at byte 0x{offset:X}: {reason}")]
    MalformedStream { offset: usize, reason: String },

    #[error("Invalid operand width: {0} (max 15)")]
    InvalidWidth(u8),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Capacity errors
    #[error(
        "{region} has exceeded its maximum size: {required} {unit} for {capacity}, remove {} {unit}",
        .required - .capacity
    )]
    CapacityExceeded { region: &'static str, unit: &'static str, required: usize, capacity: usize },

    #[error("Offset 0x{offset:X} (+{len}) lies outside the {size}-byte image")]
    InvalidOffset { offset: usize, len: usize, size: usize },

    // Text conversion errors
    #[error("Invalid table entry on line {line}: {content:?}")]
    InvalidTableEntry { line: usize, content: String },

    #[error("Character {ch:?} on script line {line} has no table entry and no single-byte code")]
    UnmappableChar { line: usize, ch: char },
}

impl Error {
    /// Amount by which a capacity check overflowed, if this is a capacity error
    pub fn overflow(&self) -> Option<usize> {
        match self {
            Error::CapacityExceeded { required, capacity, .. } => Some(required - capacity),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
