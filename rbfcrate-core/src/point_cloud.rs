//! Point cloud data structures and functionality

use crate::point::Point3;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A generic, ordered point container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

/// The original, sparse samples of an artifact, in file order
pub type SampleSet = PointCloud<Point3>;

impl<T> PointCloud<T> {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: T) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }

    /// Borrow the points as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.points
    }

    /// Consume the cloud, returning the points
    pub fn into_points(self) -> Vec<T> {
        self.points
    }
}

impl<T> Default for PointCloud<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PointCloud<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IntoIterator for PointCloud<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PointCloud<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T> Extend<T> for PointCloud<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut cloud = SampleSet::new();
        for i in 0..5 {
            cloud.push(Point3::new(i as f64, 0.0, 0.0).unwrap());
        }
        assert_eq!(cloud.len(), 5);
        let xs: Vec<f64> = cloud.iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(cloud[3].x(), 3.0);
    }

    #[test]
    fn test_collect_and_extend() {
        let mut cloud: SampleSet = (0..2)
            .map(|i| Point3::new(0.0, i as f64, 0.0).unwrap())
            .collect();
        cloud.extend([Point3::origin()]);
        assert_eq!(cloud.len(), 3);
        assert!(!cloud.is_empty());
        assert_eq!(cloud.into_points().len(), 3);
    }
}
