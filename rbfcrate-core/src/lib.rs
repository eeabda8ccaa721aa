//! Core data structures and traits for rbfcrate
//!
//! This crate provides the value types shared by the decoder, solver and
//! reconstructor: finite 3D points, ordered sample sets, kernel
//! specifications, reconstruction grids and the decoded artifact.

pub mod artifact;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod point;
pub mod point_cloud;
pub mod traits;

pub use artifact::*;
pub use error::*;
pub use grid::*;
pub use kernel::*;
pub use point::*;
pub use point_cloud::*;
pub use traits::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{DMatrix, Vector3};
