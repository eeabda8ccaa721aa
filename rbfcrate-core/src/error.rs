//! Error types for rbfcrate core types

use thiserror::Error;

/// Errors raised while constructing core values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Non-finite coordinate: ({x}, {y}, {z})")]
    NonFiniteCoordinate { x: f64, y: f64, z: f64 },

    #[error("Sample set is empty")]
    EmptySampleSet,

    #[error("Invalid reconstruction grid: {0}")]
    InvalidGrid(String),

    #[error("Unknown kernel id: {0}")]
    UnknownKernel(u8),

    #[error("Invalid shape parameter {value} for {kernel} kernel")]
    InvalidShapeParameter { kernel: &'static str, value: f64 },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
