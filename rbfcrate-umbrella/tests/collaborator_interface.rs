//! The two-call interface a host application uses

use rbfcrate::prelude::{
    encode, KernelSpec, Point3, RbfArtifact, ReconstructionGrid, SampleSet, Stage,
};

fn artifact_bytes() -> anyhow::Result<Vec<u8>> {
    let samples = SampleSet::from_points(vec![
        Point3::new(0.0, 0.0, 0.0)?,
        Point3::new(1.0, 0.0, 0.0)?,
        Point3::new(0.0, 1.0, 0.0)?,
        Point3::new(0.0, 0.0, 1.0)?,
        Point3::new(1.0, 1.0, 1.0)?,
    ]);
    let grid = ReconstructionGrid::lattice(
        [3, 3, 3],
        Point3::new(-0.5, -0.5, -0.5)?,
        Point3::new(1.5, 1.5, 1.5)?,
    )?;
    let artifact = RbfArtifact::new(samples, KernelSpec::Gaussian { epsilon: 1.5 }, grid)?;
    Ok(encode(&artifact)?)
}

#[test]
fn test_recognize_then_run() -> anyhow::Result<()> {
    let bytes = artifact_bytes()?;
    assert!(rbfcrate::is_recognized(&bytes));

    let result: rbfcrate::Reconstruction = rbfcrate::run(&bytes)?;
    assert_eq!(result.original_points.len(), 5);
    assert_eq!(result.reconstructed_points.len(), 27);
    Ok(())
}

#[test]
fn test_unrecognized_buffer() {
    let buffer = b"o cube\nv 0 0 0\n";
    assert!(!rbfcrate::is_recognized(buffer));
    let err: rbfcrate::PipelineError = rbfcrate::run(buffer).unwrap_err();
    assert_eq!(err.stage(), Stage::Decode);
}
