//! Radial basis function kernels

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Wire id of the thin-plate spline kernel
pub const KERNEL_ID_THIN_PLATE: u8 = 0;
/// Wire id of the Gaussian kernel
pub const KERNEL_ID_GAUSSIAN: u8 = 1;
/// Wire id of the multiquadric kernel
pub const KERNEL_ID_MULTIQUADRIC: u8 = 2;

/// The radial basis function of an artifact, with its shape parameter.
///
/// `r` is always a Euclidean distance in 3-space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum KernelSpec {
    /// `phi(r) = r^2 ln r`, with `phi(0) = 0`
    ThinPlate,
    /// `phi(r) = exp(-(epsilon r)^2)`
    Gaussian { epsilon: f64 },
    /// `phi(r) = sqrt(1 + (epsilon r)^2)`
    Multiquadric { epsilon: f64 },
}

impl KernelSpec {
    /// Build a kernel from its wire id and shape parameter.
    ///
    /// The shape parameter is ignored for thin-plate splines; the other
    /// kernels require it to be finite and strictly positive.
    pub fn from_id(id: u8, shape_parameter: f64) -> Result<Self> {
        let kernel = match id {
            KERNEL_ID_THIN_PLATE => return Ok(KernelSpec::ThinPlate),
            KERNEL_ID_GAUSSIAN => KernelSpec::Gaussian {
                epsilon: shape_parameter,
            },
            KERNEL_ID_MULTIQUADRIC => KernelSpec::Multiquadric {
                epsilon: shape_parameter,
            },
            other => return Err(Error::UnknownKernel(other)),
        };
        kernel.validate()?;
        Ok(kernel)
    }

    /// Check the shape parameter
    pub fn validate(&self) -> Result<()> {
        match *self {
            KernelSpec::ThinPlate => Ok(()),
            KernelSpec::Gaussian { epsilon } | KernelSpec::Multiquadric { epsilon } => {
                if epsilon.is_finite() && epsilon > 0.0 {
                    Ok(())
                } else {
                    Err(Error::InvalidShapeParameter {
                        kernel: self.name(),
                        value: epsilon,
                    })
                }
            }
        }
    }

    /// Wire id of this kernel
    pub fn id(&self) -> u8 {
        match self {
            KernelSpec::ThinPlate => KERNEL_ID_THIN_PLATE,
            KernelSpec::Gaussian { .. } => KERNEL_ID_GAUSSIAN,
            KernelSpec::Multiquadric { .. } => KERNEL_ID_MULTIQUADRIC,
        }
    }

    /// Shape parameter as stored on the wire (0.0 for thin-plate)
    pub fn shape_parameter(&self) -> f64 {
        match *self {
            KernelSpec::ThinPlate => 0.0,
            KernelSpec::Gaussian { epsilon } | KernelSpec::Multiquadric { epsilon } => epsilon,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::ThinPlate => "thin-plate",
            KernelSpec::Gaussian { .. } => "gaussian",
            KernelSpec::Multiquadric { .. } => "multiquadric",
        }
    }

    /// Evaluate the kernel at distance `r`
    #[inline(always)]
    pub fn phi(&self, r: f64) -> f64 {
        match *self {
            KernelSpec::ThinPlate => {
                if r.abs() < f64::EPSILON {
                    0.0
                } else {
                    r * r * r.ln()
                }
            }
            KernelSpec::Gaussian { epsilon } => {
                let er = epsilon * r;
                (-(er * er)).exp()
            }
            KernelSpec::Multiquadric { epsilon } => {
                let er = epsilon * r;
                (1.0 + er * er).sqrt()
            }
        }
    }
}

impl std::fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelSpec::ThinPlate => write!(f, "thin-plate"),
            KernelSpec::Gaussian { epsilon } => write!(f, "gaussian (epsilon = {})", epsilon),
            KernelSpec::Multiquadric { epsilon } => {
                write!(f, "multiquadric (epsilon = {})", epsilon)
            }
        }
    }
}
