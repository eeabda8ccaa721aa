//! Point types and related functionality

use crate::error::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A 3D point whose coordinates are always finite.
///
/// The only way to obtain a `Point3` from raw coordinates is [`Point3::new`],
/// which rejects NaN and infinities. Everything downstream (decoder, solver,
/// reconstructor) can therefore rely on finite input without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    inner: nalgebra::Point3<f64>,
}

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

impl Point3 {
    /// Create a point, failing if any coordinate is NaN or infinite
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        if x.is_finite() && y.is_finite() && z.is_finite() {
            Ok(Self {
                inner: nalgebra::Point3::new(x, y, z),
            })
        } else {
            Err(Error::NonFiniteCoordinate { x, y, z })
        }
    }

    /// The point at the origin
    pub fn origin() -> Self {
        Self {
            inner: nalgebra::Point3::origin(),
        }
    }

    pub fn x(&self) -> f64 {
        self.inner.x
    }

    pub fn y(&self) -> f64 {
        self.inner.y
    }

    pub fn z(&self) -> f64 {
        self.inner.z
    }

    /// Coordinates as a plain array
    pub fn to_array(&self) -> [f64; 3] {
        [self.inner.x, self.inner.y, self.inner.z]
    }

    /// Borrow the underlying nalgebra point
    pub fn as_nalgebra(&self) -> &nalgebra::Point3<f64> {
        &self.inner
    }

    /// Position vector from the origin
    pub fn coords(&self) -> Vector3d {
        self.inner.coords
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3) -> f64 {
        nalgebra::distance(&self.inner, &other.inner)
    }

    /// Convex combination `self * (1 - t) + other * t` for `t` in `[0, 1]`.
    ///
    /// Written as a weighted sum rather than `self + (other - self) * t` so
    /// that the difference of two large coordinates cannot overflow.
    pub fn lerp(&self, other: &Point3, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let s = 1.0 - t;
        Self {
            inner: nalgebra::Point3::new(
                self.inner.x * s + other.inner.x * t,
                self.inner.y * s + other.inner.y * t,
                self.inner.z * s + other.inner.z * t,
            ),
        }
    }

    /// Component-wise minimum
    pub fn inf(&self, other: &Point3) -> Self {
        Self {
            inner: self.inner.inf(&other.inner),
        }
    }

    /// Component-wise maximum
    pub fn sup(&self, other: &Point3) -> Self {
        Self {
            inner: self.inner.sup(&other.inner),
        }
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::origin()
    }
}

impl TryFrom<[f64; 3]> for Point3 {
    type Error = Error;

    fn try_from(value: [f64; 3]) -> Result<Self> {
        Point3::new(value[0], value[1], value[2])
    }
}

impl TryFrom<nalgebra::Point3<f64>> for Point3 {
    type Error = Error;

    fn try_from(value: nalgebra::Point3<f64>) -> Result<Self> {
        Point3::new(value.x, value.y, value.z)
    }
}

impl TryFrom<Vector3d> for Point3 {
    type Error = Error;

    fn try_from(value: Vector3d) -> Result<Self> {
        Point3::new(value.x, value.y, value.z)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(point: Point3) -> Self {
        point.to_array()
    }
}

impl From<Point3> for nalgebra::Point3<f64> {
    fn from(point: Point3) -> Self {
        point.inner
    }
}

impl std::fmt::Display for Point3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.inner.x, self.inner.y, self.inner.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(Point3::new(0.0, 1.0, 2.0).is_ok());
        assert!(matches!(
            Point3::new(f64::NAN, 0.0, 0.0),
            Err(Error::NonFiniteCoordinate { .. })
        ));
        assert!(Point3::new(0.0, f64::INFINITY, 0.0).is_err());
        assert!(Point3::new(0.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_distance() {
        let a = Point3::new(1.0, 2.0, 3.0).unwrap();
        let b = Point3::new(4.0, 6.0, 3.0).unwrap();
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_lerp_stays_finite_for_extreme_bounds() {
        let a = Point3::new(-f64::MAX, -f64::MAX, 0.0).unwrap();
        let b = Point3::new(f64::MAX, f64::MAX, 1.0).unwrap();
        let mid = a.lerp(&b, 0.5);
        assert!(mid.x().is_finite());
        assert_relative_eq!(mid.z(), 0.5);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn test_serde_as_array() {
        let p = Point3::new(1.5, -2.0, 0.25).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,-2.0,0.25]");
        let back: Point3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_inf_sup() {
        let a = Point3::new(0.0, 5.0, -1.0).unwrap();
        let b = Point3::new(2.0, 1.0, 3.0).unwrap();
        assert_eq!(a.inf(&b).to_array(), [0.0, 1.0, -1.0]);
        assert_eq!(a.sup(&b).to_array(), [2.0, 5.0, 3.0]);
    }
}
