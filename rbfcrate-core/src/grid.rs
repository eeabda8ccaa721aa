//! Reconstruction grids: the query locations an interpolant is sampled at

use crate::error::{Error, Result};
use crate::point::Point3;
use crate::traits::Bounded;
use serde::{Deserialize, Serialize};

/// A regular lattice spanning an axis-aligned box.
///
/// Points are numbered with x varying fastest, then y, then z. Along an axis
/// with resolution `r > 1` the coordinates run from `min` to `max` inclusive
/// in `r - 1` equal steps; an axis with resolution 1 sits at the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatticeFields")]
pub struct Lattice {
    resolution: [u32; 3],
    min: Point3,
    max: Point3,
}

/// Unchecked lattice fields as they appear in serialized form
#[derive(Deserialize)]
struct LatticeFields {
    resolution: [u32; 3],
    min: Point3,
    max: Point3,
}

impl TryFrom<LatticeFields> for Lattice {
    type Error = Error;

    fn try_from(fields: LatticeFields) -> Result<Self> {
        Lattice::new(fields.resolution, fields.min, fields.max)
    }
}

impl Lattice {
    /// Create a lattice, validating resolution and corner ordering
    pub fn new(resolution: [u32; 3], min: Point3, max: Point3) -> Result<Self> {
        if let Some(axis) = resolution.iter().position(|&r| r == 0) {
            return Err(Error::InvalidGrid(format!(
                "lattice resolution along axis {} must be positive",
                axis
            )));
        }
        let (lo, hi) = (min.to_array(), max.to_array());
        if let Some(axis) = (0..3).find(|&i| lo[i] > hi[i]) {
            return Err(Error::InvalidGrid(format!(
                "lattice min corner exceeds max corner along axis {} ({} > {})",
                axis, lo[axis], hi[axis]
            )));
        }
        Self::point_count(resolution).ok_or_else(|| {
            Error::InvalidGrid(format!(
                "lattice resolution {:?} overflows the addressable point count",
                resolution
            ))
        })?;
        Ok(Self {
            resolution,
            min,
            max,
        })
    }

    /// Number of lattice points for a resolution, `None` on overflow
    pub fn point_count(resolution: [u32; 3]) -> Option<usize> {
        resolution
            .iter()
            .try_fold(1usize, |acc, &r| acc.checked_mul(usize::try_from(r).ok()?))
    }

    pub fn resolution(&self) -> [u32; 3] {
        self.resolution
    }

    pub fn min(&self) -> Point3 {
        self.min
    }

    pub fn max(&self) -> Point3 {
        self.max
    }

    pub fn len(&self) -> usize {
        Self::point_count(self.resolution).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The lattice point with the given linear index
    pub fn point_at(&self, index: usize) -> Option<Point3> {
        if index >= self.len() {
            return None;
        }
        let [nx, ny, nz] = self.resolution.map(|r| r as usize);
        let ix = index % nx;
        let iy = (index / nx) % ny;
        let iz = index / (nx * ny);

        let (lo, hi) = (self.min.to_array(), self.max.to_array());
        let x = mix(lo[0], hi[0], axis_fraction(ix, nx));
        let y = mix(lo[1], hi[1], axis_fraction(iy, ny));
        let z = mix(lo[2], hi[2], axis_fraction(iz, nz));

        Point3::new(x, y, z).ok()
    }

    /// Iterate the lattice points in index order
    pub fn iter(&self) -> impl Iterator<Item = Point3> + '_ {
        (0..self.len()).filter_map(move |i| self.point_at(i))
    }
}

/// Convex combination of two finite values; never overflows
fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

fn axis_fraction(index: usize, resolution: usize) -> f64 {
    if resolution <= 1 {
        0.5
    } else {
        index as f64 / (resolution - 1) as f64
    }
}

/// Where the fitted interpolant is evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub enum ReconstructionGrid {
    /// Query points listed explicitly, in order
    Explicit(Vec<Point3>),
    /// Query points synthesised from a regular lattice
    Lattice(Lattice),
}

/// Serialized form: `{"mode": "explicit", "points": [...]}` or
/// `{"mode": "lattice", "resolution": [...], "min": [...], "max": [...]}`
#[derive(Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
enum GridRepr {
    Explicit { points: Vec<Point3> },
    Lattice(Lattice),
}

impl TryFrom<GridRepr> for ReconstructionGrid {
    type Error = Error;

    fn try_from(repr: GridRepr) -> Result<Self> {
        match repr {
            GridRepr::Explicit { points } => ReconstructionGrid::explicit(points),
            GridRepr::Lattice(lattice) => Ok(ReconstructionGrid::Lattice(lattice)),
        }
    }
}

impl From<ReconstructionGrid> for GridRepr {
    fn from(grid: ReconstructionGrid) -> Self {
        match grid {
            ReconstructionGrid::Explicit(points) => GridRepr::Explicit { points },
            ReconstructionGrid::Lattice(lattice) => GridRepr::Lattice(lattice),
        }
    }
}

impl ReconstructionGrid {
    /// An explicit grid; must contain at least one point
    pub fn explicit(points: Vec<Point3>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidGrid(
                "explicit grid must contain at least one point".to_string(),
            ));
        }
        Ok(ReconstructionGrid::Explicit(points))
    }

    /// A lattice grid between two corners
    pub fn lattice(resolution: [u32; 3], min: Point3, max: Point3) -> Result<Self> {
        Lattice::new(resolution, min, max).map(ReconstructionGrid::Lattice)
    }

    /// A lattice spanning the bounding volume of `points`
    pub fn lattice_around(points: &[Point3], resolution: [u32; 3]) -> Result<Self> {
        let (min, max) = points.bounding_box().ok_or(Error::EmptySampleSet)?;
        Self::lattice(resolution, min, max)
    }

    /// Number of query points
    pub fn len(&self) -> usize {
        match self {
            ReconstructionGrid::Explicit(points) => points.len(),
            ReconstructionGrid::Lattice(lattice) => lattice.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query point by index, in grid order
    pub fn point_at(&self, index: usize) -> Option<Point3> {
        match self {
            ReconstructionGrid::Explicit(points) => points.get(index).copied(),
            ReconstructionGrid::Lattice(lattice) => lattice.point_at(index),
        }
    }

    /// Iterate the query points in grid order; can be called repeatedly
    pub fn iter(&self) -> impl Iterator<Item = Point3> + '_ {
        (0..self.len()).filter_map(move |i| self.point_at(i))
    }

    /// Short name of the grid mode
    pub fn mode_name(&self) -> &'static str {
        match self {
            ReconstructionGrid::Explicit(_) => "explicit",
            ReconstructionGrid::Lattice(_) => "lattice",
        }
    }
}
