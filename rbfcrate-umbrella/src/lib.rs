//! # rbfcrate
//!
//! Decode RBF sample artifacts and reconstruct dense point sets from them.
//!
//! This is the umbrella crate that provides convenient access to all rbfcrate
//! functionality. A host application (a viewer, a converter) only needs two
//! calls: [`is_recognized`] to pick this format out of a byte buffer, and
//! [`run`] to turn the buffer into the original and reconstructed point sets.
//!
//! ## Quick Start
//!
//! ```rust
//! use rbfcrate::{KernelSpec, Point3, RbfArtifact, ReconstructionGrid, SampleSet};
//!
//! # fn main() -> anyhow::Result<()> {
//! let samples = SampleSet::from_points(vec![
//!     Point3::new(0.75, 0.75, 0.75)?,
//!     Point3::new(0.75, 0.25, 0.25)?,
//!     Point3::new(0.25, 0.75, 0.25)?,
//!     Point3::new(0.25, 0.25, 0.75)?,
//! ]);
//! let grid = ReconstructionGrid::lattice([2, 2, 2], Point3::origin(), Point3::new(1.0, 1.0, 1.0)?)?;
//! let artifact = RbfArtifact::new(samples, KernelSpec::ThinPlate, grid)?;
//! let bytes = rbfcrate::io::encode(&artifact)?;
//!
//! assert!(rbfcrate::is_recognized(&bytes));
//! let result = rbfcrate::run(&bytes)?;
//! assert_eq!(result.original_points.len(), 4);
//! assert_eq!(result.reconstructed_points.len(), 8);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io and reconstruction
//! - `io`: Artifact decoding, encoding and XYZ export
//! - `reconstruction`: Solver, reconstructor and pipeline (implies `io`)
//! - `all`: Enables all features

// Re-export core functionality
pub use rbfcrate_core::*;

#[cfg(feature = "io")]
pub use rbfcrate_io as io;

#[cfg(feature = "reconstruction")]
pub use rbfcrate_reconstruction as reconstruction;

#[cfg(feature = "io")]
pub use rbfcrate_io::is_recognized;

#[cfg(feature = "reconstruction")]
pub use rbfcrate_reconstruction::{run, PipelineError, Reconstruction};

/// Convenient imports for common use cases
pub mod prelude {
    pub use rbfcrate_core::*;

    #[cfg(feature = "io")]
    pub use rbfcrate_io::*;

    #[cfg(feature = "reconstruction")]
    pub use rbfcrate_reconstruction::*;
}
