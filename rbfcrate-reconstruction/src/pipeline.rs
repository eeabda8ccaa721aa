//! Decode, solve and reconstruct in one call
//!
//! The pipeline is stateless between calls: every run owns its artifact,
//! weights and output, so independent runs can execute concurrently.

use crate::error::PipelineError;
use crate::parallel::ParallelConfig;
use crate::reconstructor::Reconstructor;
use crate::solver::{PolynomialTrend, RbfSolver, SolverConfig};
use rbfcrate_core::{Point3, RbfArtifact};
use rbfcrate_io::{decode_with_config, DecoderConfig};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Configuration for the reconstruction pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub decoder: DecoderConfig,
    pub solver: SolverConfig,
    pub parallel: ParallelConfig,
}

impl PipelineConfig {
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shorthand for setting the solver's polynomial trend
    pub fn with_trend(mut self, trend: PolynomialTrend) -> Self {
        self.solver.trend = trend;
        self
    }
}

/// The two point sets handed to a viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconstruction {
    /// Samples exactly as decoded, in file order
    pub original_points: Vec<Point3>,
    /// Interpolant values, in grid order
    pub reconstructed_points: Vec<Point3>,
}

/// The reconstruction pipeline
#[derive(Debug, Clone, Default)]
pub struct ReconstructionPipeline {
    config: PipelineConfig,
}

impl ReconstructionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode `buffer` and reconstruct it
    pub fn run(&self, buffer: &[u8]) -> Result<Reconstruction, PipelineError> {
        let artifact = decode_with_config(buffer, &self.config.decoder)?;
        self.run_artifact(artifact)
    }

    /// Reconstruct an already decoded artifact
    pub fn run_artifact(&self, artifact: RbfArtifact) -> Result<Reconstruction, PipelineError> {
        let start = Instant::now();
        let parallel = self.config.parallel;

        let solver = RbfSolver::new(self.config.solver.clone()).with_parallel(parallel);
        let weights = solver.solve(artifact.samples().as_slice(), artifact.kernel())?;
        debug!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            condition = weights.condition_number(),
            "solved RBF weights"
        );

        let reconstructed_points = Reconstructor::new(
            &weights,
            artifact.samples().as_slice(),
            *artifact.kernel(),
            artifact.grid(),
        )?
        .with_parallel(parallel)
        .collect_points()?;

        info!(
            samples = artifact.samples().len(),
            reconstructed = reconstructed_points.len(),
            kernel = %artifact.kernel(),
            grid = artifact.grid().mode_name(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            "reconstruction complete"
        );

        let (samples, _, _) = artifact.into_parts();
        Ok(Reconstruction {
            original_points: samples.into_points(),
            reconstructed_points,
        })
    }
}

/// Decode and reconstruct with the default configuration
pub fn run(buffer: &[u8]) -> Result<Reconstruction, PipelineError> {
    ReconstructionPipeline::default().run(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SolverError, Stage};
    use rbfcrate_core::{KernelSpec, ReconstructionGrid, SampleSet};
    use rbfcrate_io::encode;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z).unwrap()
    }

    #[test]
    fn test_pipeline_config_builders() {
        let config = PipelineConfig::default()
            .with_trend(PolynomialTrend::Linear)
            .with_parallel(ParallelConfig::sequential())
            .with_decoder(DecoderConfig::default().with_max_lattice_points(8));
        assert_eq!(config.solver.trend, PolynomialTrend::Linear);
        assert!(!config.parallel.enabled);
        assert_eq!(config.decoder.max_lattice_points, 8);
    }

    #[test]
    fn test_run_reports_stage() {
        let err = run(b"nope").unwrap_err();
        assert_eq!(err.stage(), Stage::Decode);

        let samples = SampleSet::from_points(vec![p(0.5, 0.5, 0.5); 3]);
        let grid = ReconstructionGrid::explicit(vec![p(0.0, 0.0, 0.0)]).unwrap();
        let artifact = RbfArtifact::new(samples, KernelSpec::ThinPlate, grid).unwrap();
        let err = run(&encode(&artifact).unwrap()).unwrap_err();
        assert_eq!(err.stage(), Stage::Solve);
        assert!(matches!(
            err,
            PipelineError::Solve(SolverError::IllConditioned { .. })
        ));
    }

    #[test]
    fn test_reconstruction_serializes_camel_case() {
        let reconstruction = Reconstruction {
            original_points: vec![p(1.0, 2.0, 3.0)],
            reconstructed_points: vec![p(0.5, 0.0, -1.0)],
        };
        let json = serde_json::to_string(&reconstruction).unwrap();
        assert_eq!(
            json,
            r#"{"originalPoints":[[1.0,2.0,3.0]],"reconstructedPoints":[[0.5,0.0,-1.0]]}"#
        );
        let back: Reconstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reconstruction);
    }
}
