//! Error types for I/O operations

use thiserror::Error;

/// A typed read asked for more bytes than the buffer has left
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("read of {requested} bytes at offset {offset} exceeds buffer ({remaining} bytes remaining)")]
pub struct OutOfBounds {
    pub offset: usize,
    pub requested: usize,
    pub remaining: usize,
}

/// Errors that can occur while decoding an RBF artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Bad magic tag: expected \"#RBF\", found {found:?}")]
    BadMagic { found: Vec<u8> },

    #[error("Truncated artifact: {0}")]
    Truncated(#[from] OutOfBounds),

    #[error("Invalid grid: {message}")]
    InvalidGrid { message: String },

    #[error("Artifact declares no sample points")]
    EmptySampleSet,

    #[error("Non-finite value at byte offset {offset}")]
    NonFiniteValue { offset: usize },

    #[error("Unknown kernel id: {id}")]
    UnknownKernel { id: u8 },

    #[error("Unknown grid mode: {mode}")]
    UnknownGridMode { mode: u8 },

    #[error("Invalid shape parameter {value} for {kernel} kernel")]
    InvalidShapeParameter { kernel: &'static str, value: f64 },
}

impl From<rbfcrate_core::Error> for DecodeError {
    fn from(e: rbfcrate_core::Error) -> Self {
        match e {
            rbfcrate_core::Error::EmptySampleSet => DecodeError::EmptySampleSet,
            rbfcrate_core::Error::InvalidGrid(message) => DecodeError::InvalidGrid { message },
            rbfcrate_core::Error::UnknownKernel(id) => DecodeError::UnknownKernel { id },
            rbfcrate_core::Error::InvalidShapeParameter { kernel, value } => {
                DecodeError::InvalidShapeParameter { kernel, value }
            }
            // decoder checks coordinates with their offset before this point
            rbfcrate_core::Error::NonFiniteCoordinate { .. } => {
                DecodeError::NonFiniteValue { offset: 0 }
            }
        }
    }
}

/// Result type alias for decoding
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur while encoding an RBF artifact
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Too many {what} to encode: {count} exceeds u32::MAX")]
    TooManyPoints { what: &'static str, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from reading an artifact off disk
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
