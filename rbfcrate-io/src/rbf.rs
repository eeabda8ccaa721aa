//! RBF artifact format support
//!
//! Layout (all multi-byte values little-endian):
//!
//! ```text
//! magic        4 bytes   "#RBF"
//! point count  u32       N
//! kernel id    u8        0 = thin-plate, 1 = gaussian, 2 = multiquadric
//! shape        f64       ignored for thin-plate
//! grid mode    u8        0 = explicit, 1 = lattice
//!   explicit:  u32 count, then count x (f64, f64, f64)
//!   lattice:   3 x u32 resolution, (f64, f64, f64) min, (f64, f64, f64) max
//! samples      N x (f64, f64, f64)
//! ```

use crate::error::{DecodeError, DecodeResult, EncodeError, OutOfBounds};
use crate::reader::BinaryReader;
use rbfcrate_core::{
    KernelSpec, Lattice, Point3, RbfArtifact, ReconstructionGrid, SampleSet, KERNEL_ID_GAUSSIAN,
    KERNEL_ID_MULTIQUADRIC, KERNEL_ID_THIN_PLATE,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Magic tag at the start of every RBF artifact
pub const MAGIC: &[u8; 4] = b"#RBF";

/// Grid mode byte for an explicit list of query points
pub const GRID_MODE_EXPLICIT: u8 = 0;

/// Grid mode byte for a lattice spanning two corners
pub const GRID_MODE_LATTICE: u8 = 1;

/// Size in bytes of one encoded point
pub const POINT_RECORD_SIZE: usize = 3 * std::mem::size_of::<f64>();

/// Check whether a buffer starts with the RBF magic tag.
///
/// Does no other parsing, so callers can branch between this format and
/// unrelated mesh formats cheaply.
pub fn is_recognized(buffer: &[u8]) -> bool {
    buffer.starts_with(MAGIC)
}

/// Decode an artifact with the default [`DecoderConfig`]
pub fn decode(buffer: &[u8]) -> DecodeResult<RbfArtifact> {
    RbfDecoder::default().decode(buffer)
}

/// Decode an artifact with an explicit configuration
pub fn decode_with_config(buffer: &[u8], config: &DecoderConfig) -> DecodeResult<RbfArtifact> {
    RbfDecoder::new(config.clone()).decode(buffer)
}

/// Encode an artifact into a new byte vector
pub fn encode(artifact: &RbfArtifact) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::with_capacity(RbfWriter::encoded_len(artifact));
    RbfWriter::write(artifact, &mut bytes)?;
    Ok(bytes)
}

/// Limits applied while decoding untrusted buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest lattice (product of the three resolutions) accepted.
    ///
    /// Lattice points are synthesised rather than stored, so without a cap a
    /// few header bytes could request an arbitrarily large reconstruction.
    pub max_lattice_points: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_lattice_points: 1 << 24,
        }
    }
}

impl DecoderConfig {
    /// Set the lattice size cap
    pub fn with_max_lattice_points(mut self, max_lattice_points: usize) -> Self {
        self.max_lattice_points = max_lattice_points;
        self
    }
}

/// Header fields that precede the sample body
#[derive(Debug, Clone, PartialEq)]
pub struct RbfHeader {
    pub point_count: u32,
    pub kernel: KernelSpec,
    pub grid: ReconstructionGrid,
}

/// Decoder for RBF artifacts
#[derive(Debug, Clone, Default)]
pub struct RbfDecoder {
    config: DecoderConfig,
}

impl RbfDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a complete artifact.
    ///
    /// Pure function of `buffer`: nothing is retained after it returns.
    pub fn decode(&self, buffer: &[u8]) -> DecodeResult<RbfArtifact> {
        let mut reader = BinaryReader::new(buffer);

        Self::read_magic(&mut reader)?;
        let header = self.read_header(&mut reader)?;
        let samples = Self::read_samples(&mut reader, header.point_count)?;

        if samples.is_empty() {
            return Err(DecodeError::EmptySampleSet);
        }

        if reader.remaining() > 0 {
            debug!(
                trailing = reader.remaining(),
                "ignoring trailing bytes after RBF sample body"
            );
        }

        debug!(
            samples = samples.len(),
            kernel = %header.kernel,
            grid = header.grid.mode_name(),
            queries = header.grid.len(),
            "decoded RBF artifact"
        );

        Ok(RbfArtifact::new(samples, header.kernel, header.grid)?)
    }

    /// Decode only the magic tag and header
    pub fn decode_header(&self, buffer: &[u8]) -> DecodeResult<RbfHeader> {
        let mut reader = BinaryReader::new(buffer);
        Self::read_magic(&mut reader)?;
        self.read_header(&mut reader)
    }

    fn read_magic(reader: &mut BinaryReader<'_>) -> DecodeResult<()> {
        match reader.read_bytes(MAGIC.len()) {
            Ok(tag) if tag == MAGIC => Ok(()),
            Ok(tag) => Err(DecodeError::BadMagic {
                found: tag.to_vec(),
            }),
            Err(_) => {
                let found = reader.read_bytes(reader.remaining()).unwrap_or_default();
                Err(DecodeError::BadMagic {
                    found: found.to_vec(),
                })
            }
        }
    }

    fn read_header(&self, reader: &mut BinaryReader<'_>) -> DecodeResult<RbfHeader> {
        let point_count = reader.read_u32()?;

        let kernel_id = reader.read_u8()?;
        if !matches!(
            kernel_id,
            KERNEL_ID_THIN_PLATE | KERNEL_ID_GAUSSIAN | KERNEL_ID_MULTIQUADRIC
        ) {
            return Err(DecodeError::UnknownKernel { id: kernel_id });
        }

        let shape_offset = reader.position();
        let shape_parameter = reader.read_f64()?;
        if !shape_parameter.is_finite() {
            return Err(DecodeError::NonFiniteValue {
                offset: shape_offset,
            });
        }
        let kernel = KernelSpec::from_id(kernel_id, shape_parameter)?;

        let grid = match reader.read_u8()? {
            GRID_MODE_EXPLICIT => Self::read_explicit_grid(reader)?,
            GRID_MODE_LATTICE => self.read_lattice_grid(reader)?,
            mode => return Err(DecodeError::UnknownGridMode { mode }),
        };

        Ok(RbfHeader {
            point_count,
            kernel,
            grid,
        })
    }

    fn read_explicit_grid(reader: &mut BinaryReader<'_>) -> DecodeResult<ReconstructionGrid> {
        let count = reader.read_u32()?;
        if count == 0 {
            return Err(DecodeError::InvalidGrid {
                message: "explicit grid declares zero query points".to_string(),
            });
        }
        let points = Self::read_points(reader, count)?;
        Ok(ReconstructionGrid::explicit(points)?)
    }

    fn read_lattice_grid(&self, reader: &mut BinaryReader<'_>) -> DecodeResult<ReconstructionGrid> {
        let resolution = [reader.read_u32()?, reader.read_u32()?, reader.read_u32()?];
        if resolution.contains(&0) {
            return Err(DecodeError::InvalidGrid {
                message: format!("lattice resolution {:?} must be positive", resolution),
            });
        }

        let min = Self::read_point(reader)?;
        let max = Self::read_point(reader)?;

        match Lattice::point_count(resolution) {
            Some(n) if n <= self.config.max_lattice_points => {}
            _ => {
                return Err(DecodeError::InvalidGrid {
                    message: format!(
                        "lattice resolution {:?} exceeds the limit of {} points",
                        resolution, self.config.max_lattice_points
                    ),
                })
            }
        }

        Ok(ReconstructionGrid::lattice(resolution, min, max)?)
    }

    fn read_samples(reader: &mut BinaryReader<'_>, count: u32) -> DecodeResult<SampleSet> {
        Self::read_points(reader, count).map(SampleSet::from_points)
    }

    /// Read `count` point records, checking up front that they all fit
    fn read_points(reader: &mut BinaryReader<'_>, count: u32) -> DecodeResult<Vec<Point3>> {
        let count = count as usize;
        let needed = count.checked_mul(POINT_RECORD_SIZE).ok_or(OutOfBounds {
            offset: reader.position(),
            requested: usize::MAX,
            remaining: reader.remaining(),
        })?;
        reader.ensure_remaining(needed)?;

        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(Self::read_point(reader)?);
        }
        Ok(points)
    }

    fn read_point(reader: &mut BinaryReader<'_>) -> DecodeResult<Point3> {
        let offset = reader.position();
        let coords = reader.read_f64_triple()?;
        if let Some(axis) = coords.iter().position(|c| !c.is_finite()) {
            return Err(DecodeError::NonFiniteValue {
                offset: offset + axis * std::mem::size_of::<f64>(),
            });
        }
        Ok(Point3::new(coords[0], coords[1], coords[2])?)
    }
}

/// Writer for RBF artifacts
pub struct RbfWriter;

impl RbfWriter {
    /// Number of bytes [`RbfWriter::write`] produces for `artifact`
    pub fn encoded_len(artifact: &RbfArtifact) -> usize {
        let grid_len = match artifact.grid() {
            ReconstructionGrid::Explicit(points) => 4 + points.len() * POINT_RECORD_SIZE,
            ReconstructionGrid::Lattice(_) => 3 * 4 + 2 * POINT_RECORD_SIZE,
        };
        MAGIC.len() + 4 + 1 + 8 + 1 + grid_len + artifact.samples().len() * POINT_RECORD_SIZE
    }

    /// Write an artifact to a file
    pub fn write_to_path<P: AsRef<Path>>(artifact: &RbfArtifact, path: P) -> Result<(), EncodeError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write(artifact, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write an artifact to any writer
    pub fn write<W: Write>(artifact: &RbfArtifact, writer: &mut W) -> Result<(), EncodeError> {
        let point_count = Self::count_to_u32("sample points", artifact.samples().len())?;

        writer.write_all(MAGIC)?;
        writer.write_all(&point_count.to_le_bytes())?;
        writer.write_all(&[artifact.kernel().id()])?;
        writer.write_all(&artifact.kernel().shape_parameter().to_le_bytes())?;

        match artifact.grid() {
            ReconstructionGrid::Explicit(points) => {
                let count = Self::count_to_u32("grid points", points.len())?;
                writer.write_all(&[GRID_MODE_EXPLICIT])?;
                writer.write_all(&count.to_le_bytes())?;
                for point in points {
                    Self::write_point(writer, point)?;
                }
            }
            ReconstructionGrid::Lattice(lattice) => {
                writer.write_all(&[GRID_MODE_LATTICE])?;
                for r in lattice.resolution() {
                    writer.write_all(&r.to_le_bytes())?;
                }
                Self::write_point(writer, &lattice.min())?;
                Self::write_point(writer, &lattice.max())?;
            }
        }

        for point in artifact.samples() {
            Self::write_point(writer, point)?;
        }

        Ok(())
    }

    fn write_point<W: Write>(writer: &mut W, point: &Point3) -> Result<(), EncodeError> {
        for c in point.to_array() {
            writer.write_all(&c.to_le_bytes())?;
        }
        Ok(())
    }

    fn count_to_u32(what: &'static str, count: usize) -> Result<u32, EncodeError> {
        u32::try_from(count).map_err(|_| EncodeError::TooManyPoints { what, count })
    }
}
