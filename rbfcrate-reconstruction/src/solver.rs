//! RBF weight fitting
//!
//! Fits the interpolant `f(q) = sum_i w_i phi(|q - p_i|) + trend(q)` so that
//! `f(p_i) = p_i` for every sample. The weights and trend coefficients come
//! from the symmetric saddle-point system
//!
//! ```text
//! | K   P | | w |   | p |
//! | P^T 0 | | c | = | 0 |
//! ```
//!
//! with `K[i][j] = phi(|p_i - p_j|)` and `P` the trend basis evaluated at
//! each sample. All three coordinate axes share one factorisation.
//!
//! Each column of `P` is rescaled to the magnitude of `K` before the
//! factorisation and the trend coefficients are scaled back afterwards, so the
//! reported condition number does not depend on the units of the samples.

use crate::error::SolverError;
use crate::parallel::{self, ParallelConfig};
use nalgebra::{DMatrix, SymmetricEigen, Vector3};
use rbfcrate_core::{KernelSpec, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Low-order polynomial added to the radial sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolynomialTrend {
    /// A constant offset; reproduces constant fields
    #[default]
    Constant,
    /// `c0 + c1 x + c2 y + c3 z`; reproduces affine fields
    Linear,
}

impl PolynomialTrend {
    /// Number of basis terms
    pub fn terms(&self) -> usize {
        match self {
            PolynomialTrend::Constant => 1,
            PolynomialTrend::Linear => 4,
        }
    }

    /// Basis values at `point`; only the first [`terms`](Self::terms) are used
    #[inline]
    pub fn basis(&self, point: &Point3) -> [f64; 4] {
        [1.0, point.x(), point.y(), point.z()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            PolynomialTrend::Constant => "constant",
            PolynomialTrend::Linear => "linear",
        }
    }
}

/// Configuration for [`RbfSolver`]
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Systems with a larger 2-norm condition number are rejected
    pub max_condition_number: f64,
    /// Polynomial trend appended to the kernel matrix
    pub trend: PolynomialTrend,
    /// Iteration cap for the eigendecomposition
    pub max_eigen_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_condition_number: 1e12,
            trend: PolynomialTrend::Constant,
            max_eigen_iterations: 100_000,
        }
    }
}

impl SolverConfig {
    pub fn with_max_condition_number(mut self, max_condition_number: f64) -> Self {
        self.max_condition_number = max_condition_number;
        self
    }

    pub fn with_trend(mut self, trend: PolynomialTrend) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_max_eigen_iterations(mut self, max_eigen_iterations: usize) -> Self {
        self.max_eigen_iterations = max_eigen_iterations;
        self
    }
}

/// Fitted weights: one 3-vector per sample plus the trend coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    weights: Vec<Vector3<f64>>,
    trend: PolynomialTrend,
    coefficients: Vec<Vector3<f64>>,
    condition_number: f64,
}

impl WeightVector {
    /// Number of per-sample weights
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[Vector3<f64>] {
        &self.weights
    }

    pub fn trend(&self) -> PolynomialTrend {
        self.trend
    }

    /// Trend coefficients, one per basis term
    pub fn coefficients(&self) -> &[Vector3<f64>] {
        &self.coefficients
    }

    /// Condition number of the equilibrated system these weights were solved
    /// from
    pub fn condition_number(&self) -> f64 {
        self.condition_number
    }

    /// Value of the polynomial trend at `point`
    #[inline]
    pub fn trend_at(&self, point: &Point3) -> Vector3<f64> {
        let basis = self.trend.basis(point);
        self.coefficients
            .iter()
            .zip(basis.iter())
            .fold(Vector3::zeros(), |acc, (c, b)| acc + c * *b)
    }
}

/// Solves for RBF weights
#[derive(Debug, Clone, Default)]
pub struct RbfSolver {
    config: SolverConfig,
    parallel: ParallelConfig,
}

impl RbfSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            parallel: ParallelConfig::default(),
        }
    }

    /// Control parallel assembly of the kernel matrix
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit weights so the interpolant reproduces every sample
    pub fn solve(&self, samples: &[Point3], kernel: &KernelSpec) -> Result<WeightVector, SolverError> {
        if samples.is_empty() {
            return Err(SolverError::EmptySampleSet);
        }
        kernel.validate()?;

        let n = samples.len();
        let trend = self.config.trend;
        let size = n + trend.terms();

        let (matrix, trend_scales) = self.system_matrix(samples, kernel);
        if matrix.iter().any(|v| !v.is_finite()) {
            warn!(samples = n, kernel = %kernel, "kernel matrix contains non-finite entries");
            return Err(SolverError::IllConditioned {
                condition: f64::INFINITY,
            });
        }

        let mut rhs = DMatrix::<f64>::zeros(size, 3);
        for (i, p) in samples.iter().enumerate() {
            rhs[(i, 0)] = p.x();
            rhs[(i, 1)] = p.y();
            rhs[(i, 2)] = p.z();
        }

        let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, self.config.max_eigen_iterations)
            .ok_or_else(|| {
                warn!(samples = n, "eigendecomposition did not converge");
                SolverError::IllConditioned {
                    condition: f64::INFINITY,
                }
            })?;

        let condition = condition_number(eigen.eigenvalues.as_slice());
        debug!(
            samples = n,
            kernel = %kernel,
            trend = trend.name(),
            condition,
            "factorised interpolation system"
        );

        // NaN fails this comparison too
        if !(condition <= self.config.max_condition_number) {
            warn!(
                condition,
                limit = self.config.max_condition_number,
                "rejecting ill-conditioned interpolation system"
            );
            return Err(SolverError::IllConditioned { condition });
        }

        // x = V diag(1/lambda) V^T b
        let mut projected = eigen.eigenvectors.transpose() * &rhs;
        for (i, lambda) in eigen.eigenvalues.iter().enumerate() {
            let inv = 1.0 / lambda;
            for c in 0..3 {
                projected[(i, c)] *= inv;
            }
        }
        let solution = &eigen.eigenvectors * projected;

        if solution.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::IllConditioned { condition });
        }

        let row = |i: usize| Vector3::new(solution[(i, 0)], solution[(i, 1)], solution[(i, 2)]);

        Ok(WeightVector {
            weights: (0..n).map(row).collect(),
            trend,
            coefficients: (n..size).map(|i| row(i) * trend_scales[i - n]).collect(),
            condition_number: condition,
        })
    }

    /// Assemble `[[K, P D], [D P^T, 0]]` and return it with the diagonal of `D`
    fn system_matrix(&self, samples: &[Point3], kernel: &KernelSpec) -> (DMatrix<f64>, Vec<f64>) {
        let n = samples.len();
        let trend = self.config.trend;
        let terms = trend.terms();

        let kernel_rows: Vec<Vec<f64>> = parallel::parallel_map(samples, &self.parallel, |p| {
            samples.iter().map(|q| kernel.phi(p.distance(q))).collect()
        });
        let basis: Vec<[f64; 4]> = samples.iter().map(|p| trend.basis(p)).collect();

        let kernel_scale = max_abs(kernel_rows.iter().flatten().copied());
        let trend_scales: Vec<f64> = (0..terms)
            .map(|t| equilibration_scale(kernel_scale, max_abs(basis.iter().map(|b| b[t]))))
            .collect();

        let matrix = DMatrix::from_fn(n + terms, n + terms, |i, j| match (i < n, j < n) {
            (true, true) => kernel_rows[i][j],
            (true, false) => basis[i][j - n] * trend_scales[j - n],
            (false, true) => basis[j][i - n] * trend_scales[i - n],
            (false, false) => 0.0,
        });
        (matrix, trend_scales)
    }
}

fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Factor bringing a trend column of magnitude `column` up to `kernel`
fn equilibration_scale(kernel: f64, column: f64) -> f64 {
    if kernel > 0.0 && kernel.is_finite() && column > 0.0 {
        kernel / column
    } else {
        1.0
    }
}

/// Ratio of the largest to smallest eigenvalue magnitude
fn condition_number(eigenvalues: &[f64]) -> f64 {
    let (largest, smallest) = eigenvalues
        .iter()
        .map(|l| l.abs())
        .fold((0.0f64, f64::INFINITY), |(hi, lo), l| (hi.max(l), lo.min(l)));
    if smallest > 0.0 {
        largest / smallest
    } else {
        f64::INFINITY
    }
}

/// Fit weights with the default configuration
pub fn solve(samples: &[Point3], kernel: &KernelSpec) -> Result<WeightVector, SolverError> {
    RbfSolver::default().solve(samples, kernel)
}
