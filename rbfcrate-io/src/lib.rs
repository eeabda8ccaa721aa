//! I/O for RBF artifacts
//!
//! This crate decodes the binary RBF artifact format into an
//! [`RbfArtifact`](rbfcrate_core::RbfArtifact), encodes artifacts back into
//! the same layout, and exports reconstructed points as plain-text XYZ.

pub mod error;
pub mod rbf;
pub mod reader;
pub mod xyz;

pub use error::*;
pub use rbf::{
    decode, decode_with_config, encode, is_recognized, DecoderConfig, RbfDecoder, RbfHeader,
    RbfWriter, GRID_MODE_EXPLICIT, GRID_MODE_LATTICE, MAGIC, POINT_RECORD_SIZE,
};
pub use reader::BinaryReader;
pub use xyz::{Delimiter, XyzWriteOptions, XyzWriter};

use rbfcrate_core::RbfArtifact;
use std::path::Path;

/// Read and decode an artifact file
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<RbfArtifact, ReadError> {
    let bytes = std::fs::read(path)?;
    Ok(decode(&bytes)?)
}

/// Encode an artifact to a file
pub fn write_artifact<P: AsRef<Path>>(artifact: &RbfArtifact, path: P) -> Result<(), EncodeError> {
    RbfWriter::write_to_path(artifact, path)
}
