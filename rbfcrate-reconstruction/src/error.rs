//! Error types for solving and reconstruction

use rbfcrate_io::DecodeError;
use thiserror::Error;

/// Errors from fitting RBF weights
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Cannot fit an interpolant to an empty sample set")]
    EmptySampleSet,

    #[error("Interpolation system is ill-conditioned (condition number {condition:e})")]
    IllConditioned { condition: f64 },

    #[error("Invalid kernel: {0}")]
    InvalidKernel(#[from] rbfcrate_core::Error),
}

/// Errors from evaluating a fitted interpolant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructError {
    #[error("Weight vector has {found} entries but there are {expected} samples")]
    WeightMismatch { expected: usize, found: usize },

    #[error("Interpolant evaluated to a non-finite value at grid index {index}")]
    NonFiniteOutput { index: usize },
}

/// Errors from configuring the worker pool
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    #[error("Failed to create thread pool: {0}")]
    ThreadPoolBuild(String),
}

/// Pipeline stage names, for reporting which step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decode,
    Solve,
    Reconstruct,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Decode => "decode",
            Stage::Solve => "solve",
            Stage::Reconstruct => "reconstruct",
        };
        f.write_str(name)
    }
}

/// The first failure of a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Solve failed: {0}")]
    Solve(#[from] SolverError),

    #[error("Reconstruction failed: {0}")]
    Reconstruct(#[from] ReconstructError),
}

impl PipelineError {
    /// Which stage produced this error
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Decode(_) => Stage::Decode,
            PipelineError::Solve(_) => Stage::Solve,
            PipelineError::Reconstruct(_) => Stage::Reconstruct,
        }
    }
}
