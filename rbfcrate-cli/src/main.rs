//! rbfcrate command line tool
//!
//! Inspect RBF artifacts, reconstruct them to JSON or XYZ, and write demo
//! artifacts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rbfcrate_core::{Bounded, KernelSpec, Point3, RbfArtifact, ReconstructionGrid, SampleSet};
use rbfcrate_io::{read_artifact, write_artifact, XyzWriteOptions, XyzWriter};
use rbfcrate_reconstruction::{
    init_thread_pool, ParallelConfig, PipelineConfig, PolynomialTrend, Reconstruction,
    ReconstructionPipeline, ThreadPoolConfig,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rbfcrate", version, about = "Inspect and reconstruct RBF artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the header and sample summary of an artifact
    Inspect {
        /// Artifact file
        file: PathBuf,
    },
    /// Fit the interpolant and evaluate it over the artifact's grid
    Reconstruct {
        /// Artifact file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (rayon's default if omitted)
        #[arg(long)]
        threads: Option<usize>,
        /// Evaluate on the calling thread only
        #[arg(long)]
        sequential: bool,
        /// Polynomial trend added to the radial sum
        #[arg(long, value_enum, default_value_t = TrendArg::Constant)]
        trend: TrendArg,
        /// Reject systems with a larger condition number
        #[arg(long)]
        max_condition: Option<f64>,
    },
    /// Write a small sample artifact
    Demo {
        /// Output file
        #[arg(short, long, default_value = "demo.rbf")]
        output: PathBuf,
        /// Kernel to store in the artifact
        #[arg(long, value_enum, default_value_t = KernelArg::ThinPlate)]
        kernel: KernelArg,
        /// Shape parameter for gaussian and multiquadric kernels
        #[arg(long, default_value_t = 1.0)]
        epsilon: f64,
        /// Lattice points per axis
        #[arg(long, default_value_t = 8)]
        resolution: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Xyz,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TrendArg {
    Constant,
    Linear,
}

impl From<TrendArg> for PolynomialTrend {
    fn from(arg: TrendArg) -> Self {
        match arg {
            TrendArg::Constant => PolynomialTrend::Constant,
            TrendArg::Linear => PolynomialTrend::Linear,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KernelArg {
    ThinPlate,
    Gaussian,
    Multiquadric,
}

impl KernelArg {
    fn to_kernel(self, epsilon: f64) -> KernelSpec {
        match self {
            KernelArg::ThinPlate => KernelSpec::ThinPlate,
            KernelArg::Gaussian => KernelSpec::Gaussian { epsilon },
            KernelArg::Multiquadric => KernelSpec::Multiquadric { epsilon },
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rbfcrate_io=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file } => inspect(&file),
        Commands::Reconstruct {
            file,
            format,
            output,
            threads,
            sequential,
            trend,
            max_condition,
        } => {
            let mut config = PipelineConfig::default().with_trend(trend.into());
            if sequential {
                config = config.with_parallel(ParallelConfig::sequential());
            }
            if let Some(limit) = max_condition {
                config.solver = config.solver.with_max_condition_number(limit);
            }
            reconstruct(&file, format, output.as_deref(), threads, config)
        }
        Commands::Demo {
            output,
            kernel,
            epsilon,
            resolution,
        } => demo(&output, kernel.to_kernel(epsilon), resolution),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn inspect(file: &Path) -> Result<()> {
    let artifact =
        read_artifact(file).with_context(|| format!("Failed to read {}", file.display()))?;

    println!("file:     {}", file.display());
    println!("samples:  {}", artifact.samples().len());
    println!("kernel:   {}", artifact.kernel());
    match artifact.grid() {
        ReconstructionGrid::Explicit(points) => {
            println!("grid:     explicit, {} points", points.len());
        }
        ReconstructionGrid::Lattice(lattice) => {
            let [nx, ny, nz] = lattice.resolution();
            println!(
                "grid:     lattice {}x{}x{} ({} points) from {} to {}",
                nx,
                ny,
                nz,
                lattice.len(),
                lattice.min(),
                lattice.max()
            );
        }
    }
    if let Some((min, max)) = artifact.samples().bounding_box() {
        println!("bounds:   {} to {}", min, max);
    }
    Ok(())
}

fn reconstruct(
    file: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    threads: Option<usize>,
    config: PipelineConfig,
) -> Result<()> {
    if let Some(threads) = threads {
        init_thread_pool(ThreadPoolConfig::default().with_threads(threads))
            .context("Failed to set up worker threads")?;
    }

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let reconstruction = ReconstructionPipeline::new(config)
        .run(&bytes)
        .with_context(|| format!("Failed to reconstruct {}", file.display()))?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_reconstruction(&reconstruction, format, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "wrote reconstruction");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_reconstruction(&reconstruction, format, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_reconstruction<W: Write>(
    reconstruction: &Reconstruction,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, reconstruction)?;
            writeln!(writer)?;
        }
        OutputFormat::Xyz => {
            XyzWriter::write_points(
                &reconstruction.reconstructed_points,
                writer,
                &XyzWriteOptions::default(),
            )?;
        }
    }
    Ok(())
}

/// Tetrahedron samples centred in the unit cube, with a lattice over the cube
fn demo_artifact(kernel: KernelSpec, resolution: u32) -> Result<RbfArtifact> {
    let samples = [
        [0.75, 0.75, 0.75],
        [0.75, 0.25, 0.25],
        [0.25, 0.75, 0.25],
        [0.25, 0.25, 0.75],
    ]
    .into_iter()
    .map(Point3::try_from)
    .collect::<rbfcrate_core::Result<SampleSet>>()?;

    let grid = ReconstructionGrid::lattice(
        [resolution; 3],
        Point3::origin(),
        Point3::new(1.0, 1.0, 1.0)?,
    )?;
    Ok(RbfArtifact::new(samples, kernel, grid)?)
}

fn demo(output: &Path, kernel: KernelSpec, resolution: u32) -> Result<()> {
    let artifact = demo_artifact(kernel, resolution)?;
    write_artifact(&artifact, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        kernel = %kernel,
        queries = artifact.grid().len(),
        "wrote demo artifact"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_reconstruct_flags() {
        let cli = Cli::try_parse_from([
            "rbfcrate",
            "reconstruct",
            "in.rbf",
            "--format",
            "xyz",
            "--trend",
            "linear",
            "--sequential",
            "--max-condition",
            "1e8",
        ])
        .unwrap();
        match cli.command {
            Commands::Reconstruct {
                format,
                trend,
                sequential,
                max_condition,
                ..
            } => {
                assert_eq!(format, OutputFormat::Xyz);
                assert_eq!(trend, TrendArg::Linear);
                assert!(sequential);
                assert_eq!(max_condition, Some(1e8));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_demo_artifact_reconstructs() {
        let artifact = demo_artifact(KernelArg::ThinPlate.to_kernel(1.0), 3).unwrap();
        assert_eq!(artifact.samples().len(), 4);
        assert_eq!(artifact.grid().len(), 27);

        let reconstruction = ReconstructionPipeline::default()
            .run_artifact(artifact)
            .unwrap();
        let mut out = Vec::new();
        write_reconstruction(&reconstruction, OutputFormat::Xyz, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 27);
    }

    #[test]
    fn test_demo_rejects_bad_epsilon() {
        assert!(demo_artifact(KernelArg::Gaussian.to_kernel(0.0), 2).is_err());
    }
}
