//! # rbfcrate Reconstruction
//!
//! Fits radial basis function interpolants to sparse 3D samples and
//! evaluates them over a reconstruction grid.
//!
//! - [`solver`]: builds and solves the kernel system for per-sample weights
//! - [`reconstructor`]: evaluates the fitted interpolant at grid points
//! - [`pipeline`]: decode, solve and reconstruct in one call
//! - [`parallel`]: thread pool setup and order-preserving parallel maps

pub mod error;
pub mod parallel;
pub mod pipeline;
pub mod reconstructor;
pub mod solver;

// Re-export commonly used items
pub use error::*;
pub use parallel::{init_thread_pool, ParallelConfig, ThreadPoolConfig};
pub use pipeline::{run, PipelineConfig, Reconstruction, ReconstructionPipeline};
pub use reconstructor::{reconstruct, Reconstructor};
pub use solver::{solve, PolynomialTrend, RbfSolver, SolverConfig, WeightVector};
