//! Core traits for rbfcrate

use crate::{grid::ReconstructionGrid, point::Point3, point_cloud::PointCloud};

/// Trait for objects occupying an axis-aligned region of space
pub trait Bounded {
    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty
    fn bounding_box(&self) -> Option<(Point3, Point3)>;

    /// Centre of the bounding box
    fn center(&self) -> Option<Point3> {
        self.bounding_box().map(|(min, max)| min.lerp(&max, 0.5))
    }
}

impl Bounded for [Point3] {
    fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let first = self.first()?;
        Some(
            self.iter()
                .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p))),
        )
    }
}

impl Bounded for PointCloud<Point3> {
    fn bounding_box(&self) -> Option<(Point3, Point3)> {
        self.as_slice().bounding_box()
    }
}

impl Bounded for ReconstructionGrid {
    fn bounding_box(&self) -> Option<(Point3, Point3)> {
        match self {
            ReconstructionGrid::Explicit(points) => points.as_slice().bounding_box(),
            ReconstructionGrid::Lattice(lattice) => Some((lattice.min(), lattice.max())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let cloud = PointCloud::from_points(vec![
            Point3::new(0.0, 2.0, -1.0).unwrap(),
            Point3::new(1.0, -3.0, 4.0).unwrap(),
            Point3::new(0.5, 0.0, 0.0).unwrap(),
        ]);
        let (min, max) = cloud.bounding_box().unwrap();
        assert_eq!(min.to_array(), [0.0, -3.0, -1.0]);
        assert_eq!(max.to_array(), [1.0, 2.0, 4.0]);
        assert_eq!(cloud.center().unwrap().to_array(), [0.5, -0.5, 1.5]);
    }

    #[test]
    fn test_empty_has_no_bounds() {
        let cloud: PointCloud<Point3> = PointCloud::new();
        assert!(cloud.bounding_box().is_none());
        assert!(cloud.center().is_none());
    }
}
