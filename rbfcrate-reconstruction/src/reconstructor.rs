//! Evaluates a fitted interpolant over a reconstruction grid

use crate::error::ReconstructError;
use crate::parallel::{self, ParallelConfig};
use crate::solver::WeightVector;
use nalgebra::Vector3;
use rbfcrate_core::{KernelSpec, Point3, ReconstructionGrid};

/// A fitted interpolant bound to the grid it will be sampled on
#[derive(Debug, Clone)]
pub struct Reconstructor<'a> {
    weights: &'a WeightVector,
    samples: &'a [Point3],
    kernel: KernelSpec,
    grid: &'a ReconstructionGrid,
    parallel: ParallelConfig,
}

impl<'a> Reconstructor<'a> {
    /// Bind weights to their samples and a grid.
    ///
    /// Fails with [`ReconstructError::WeightMismatch`] if the weights were
    /// solved for a different number of samples.
    pub fn new(
        weights: &'a WeightVector,
        samples: &'a [Point3],
        kernel: KernelSpec,
        grid: &'a ReconstructionGrid,
    ) -> Result<Self, ReconstructError> {
        if weights.len() != samples.len() {
            return Err(ReconstructError::WeightMismatch {
                expected: samples.len(),
                found: weights.len(),
            });
        }
        Ok(Self {
            weights,
            samples,
            kernel,
            grid,
            parallel: ParallelConfig::default(),
        })
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn grid(&self) -> &ReconstructionGrid {
        self.grid
    }

    /// Evaluate the interpolant at an arbitrary point
    #[inline]
    pub fn evaluate(&self, query: &Point3) -> Vector3<f64> {
        let radial = self
            .samples
            .iter()
            .zip(self.weights.weights())
            .fold(Vector3::zeros(), |acc, (sample, w)| {
                acc + w * self.kernel.phi(query.distance(sample))
            });
        radial + self.weights.trend_at(query)
    }

    /// Evaluate at the grid point with the given index
    pub fn evaluate_index(&self, index: usize) -> Result<Point3, ReconstructError> {
        let query = self
            .grid
            .point_at(index)
            .ok_or(ReconstructError::NonFiniteOutput { index })?;
        let v = self.evaluate(&query);
        Point3::new(v.x, v.y, v.z).map_err(|_| ReconstructError::NonFiniteOutput { index })
    }

    /// Lazily evaluate the grid in order; each call starts from the beginning
    pub fn iter(&self) -> impl Iterator<Item = Result<Point3, ReconstructError>> + '_ {
        (0..self.grid.len()).map(move |i| self.evaluate_index(i))
    }

    /// Evaluate every grid point, in grid order.
    ///
    /// On failure the error for the lowest failing index is returned, the
    /// same one a sequential run would stop at.
    pub fn collect_points(&self) -> Result<Vec<Point3>, ReconstructError> {
        parallel::map_indices(self.grid.len(), &self.parallel, |i| self.evaluate_index(i))
            .into_iter()
            .collect()
    }
}

/// Evaluate a fitted interpolant at every grid point
pub fn reconstruct(
    weights: &WeightVector,
    samples: &[Point3],
    kernel: &KernelSpec,
    grid: &ReconstructionGrid,
) -> Result<Vec<Point3>, ReconstructError> {
    Reconstructor::new(weights, samples, *kernel, grid)?.collect_points()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{solve, RbfSolver, SolverConfig};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z).unwrap()
    }

    fn samples() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(0.7, 0.6, 0.5),
        ]
    }

    #[test]
    fn test_explicit_grid_reproduces_samples() {
        let samples = samples();
        let kernel = KernelSpec::ThinPlate;
        let weights = solve(&samples, &kernel).unwrap();
        let grid = ReconstructionGrid::explicit(samples.clone()).unwrap();

        let out = reconstruct(&weights, &samples, &kernel, &grid).unwrap();
        assert_eq!(out.len(), samples.len());
        for (o, s) in out.iter().zip(&samples) {
            assert_relative_eq!(o.coords(), s.coords(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_weight_mismatch() {
        let samples = samples();
        let kernel = KernelSpec::ThinPlate;
        let weights = solve(&samples[..4], &kernel).unwrap();
        let grid = ReconstructionGrid::explicit(vec![p(0.5, 0.5, 0.5)]).unwrap();
        assert_eq!(
            reconstruct(&weights, &samples, &kernel, &grid),
            Err(ReconstructError::WeightMismatch {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_iter_is_lazy_and_restartable() {
        let samples = samples();
        let kernel = KernelSpec::Gaussian { epsilon: 1.0 };
        let weights = solve(&samples, &kernel).unwrap();
        let grid =
            ReconstructionGrid::lattice([3, 2, 2], p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).unwrap();
        let reconstructor = Reconstructor::new(&weights, &samples, kernel, &grid).unwrap();

        let first: Vec<Point3> = reconstructor.iter().take(2).map(Result::unwrap).collect();
        let all: Vec<Point3> = reconstructor.iter().map(Result::unwrap).collect();
        assert_eq!(all.len(), 12);
        assert_eq!(&all[..2], &first[..]);
        assert_eq!(all, reconstructor.collect_points().unwrap());
    }

    #[test]
    fn test_parallel_and_sequential_agree_bitwise() {
        let samples = samples();
        let kernel = KernelSpec::Multiquadric { epsilon: 0.8 };
        let weights = solve(&samples, &kernel).unwrap();
        let grid =
            ReconstructionGrid::lattice([9, 8, 7], p(-1.0, -1.0, -1.0), p(2.0, 2.0, 2.0)).unwrap();

        let sequential = Reconstructor::new(&weights, &samples, kernel, &grid)
            .unwrap()
            .with_parallel(ParallelConfig::sequential())
            .collect_points()
            .unwrap();
        let parallel = Reconstructor::new(&weights, &samples, kernel, &grid)
            .unwrap()
            .with_parallel(ParallelConfig::default().with_min_parallel_len(2))
            .collect_points()
            .unwrap();
        assert_eq!(sequential.len(), 504);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_overflow_reports_first_index() {
        let samples = samples();
        let kernel = KernelSpec::Multiquadric { epsilon: 1.0 };
        let weights = RbfSolver::new(SolverConfig::default())
            .solve(&samples, &kernel)
            .unwrap();
        let grid = ReconstructionGrid::explicit(vec![
            p(0.5, 0.5, 0.5),
            p(f64::MAX, f64::MAX, f64::MAX),
            p(-f64::MAX, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(
            reconstruct(&weights, &samples, &kernel, &grid),
            Err(ReconstructError::NonFiniteOutput { index: 1 })
        );
    }
}
