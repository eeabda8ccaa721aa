//! The decoded RBF artifact

use crate::error::{Error, Result};
use crate::{grid::ReconstructionGrid, kernel::KernelSpec, point_cloud::SampleSet};
use serde::{Deserialize, Serialize};

/// Everything needed to fit and sample one interpolant.
///
/// Constructed once per decode and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArtifactFields")]
pub struct RbfArtifact {
    samples: SampleSet,
    kernel: KernelSpec,
    grid: ReconstructionGrid,
}

#[derive(Deserialize)]
struct ArtifactFields {
    samples: SampleSet,
    kernel: KernelSpec,
    grid: ReconstructionGrid,
}

impl TryFrom<ArtifactFields> for RbfArtifact {
    type Error = Error;

    fn try_from(fields: ArtifactFields) -> Result<Self> {
        RbfArtifact::new(fields.samples, fields.kernel, fields.grid)
    }
}

impl RbfArtifact {
    /// Assemble an artifact, checking the sample set is non-empty and the
    /// kernel's shape parameter is usable
    pub fn new(samples: SampleSet, kernel: KernelSpec, grid: ReconstructionGrid) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptySampleSet);
        }
        if grid.is_empty() {
            return Err(Error::InvalidGrid("grid has no query points".to_string()));
        }
        kernel.validate()?;
        Ok(Self {
            samples,
            kernel,
            grid,
        })
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn grid(&self) -> &ReconstructionGrid {
        &self.grid
    }

    /// Split the artifact into its parts
    pub fn into_parts(self) -> (SampleSet, KernelSpec, ReconstructionGrid) {
        (self.samples, self.kernel, self.grid)
    }
}
