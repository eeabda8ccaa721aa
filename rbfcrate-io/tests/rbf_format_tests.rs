//! Format-level tests for RBF artifact decoding and encoding

use proptest::prelude::*;
use rbfcrate_core::{KernelSpec, Point3, RbfArtifact, ReconstructionGrid, SampleSet};
use rbfcrate_io::{
    decode, encode, is_recognized, read_artifact, write_artifact, DecodeError, ReadError,
};

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z).unwrap()
}

fn sample_artifact() -> RbfArtifact {
    let samples = SampleSet::from_points(vec![
        p(0.1, 0.2, 0.3),
        p(-1.5, 2.25, 8.0),
        p(1e-7, -3e5, 0.0),
    ]);
    let grid = ReconstructionGrid::explicit(vec![p(0.0, 0.0, 0.0), p(0.5, 0.5, 0.5)]).unwrap();
    RbfArtifact::new(samples, KernelSpec::Multiquadric { epsilon: 1.25 }, grid).unwrap()
}

#[test]
fn test_encoded_artifact_decodes_to_itself() {
    let artifact = sample_artifact();
    let bytes = encode(&artifact).unwrap();
    assert!(is_recognized(&bytes));
    assert_eq!(decode(&bytes).unwrap(), artifact);
}

#[test]
fn test_every_proper_prefix_fails_cleanly() {
    let bytes = encode(&sample_artifact()).unwrap();
    for len in 0..bytes.len() {
        let result = decode(&bytes[..len]);
        match result {
            Err(DecodeError::BadMagic { .. }) => assert!(len < 4, "prefix {}", len),
            Err(DecodeError::Truncated(_)) => assert!(len >= 4, "prefix {}", len),
            other => panic!("prefix of {} bytes decoded as {:?}", len, other),
        }
    }
}

#[test]
fn test_file_roundtrip() {
    let artifact = sample_artifact();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.rbf");

    write_artifact(&artifact, &path).unwrap();
    assert_eq!(read_artifact(&path).unwrap(), artifact);
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_artifact(dir.path().join("missing.rbf"));
    assert!(matches!(result, Err(ReadError::Io(_))));
}

#[test]
fn test_other_formats_are_not_recognized() {
    assert!(!is_recognized(b"ply\nformat binary_little_endian 1.0\n"));
    assert!(!is_recognized(b"# .PCD v0.7"));
    assert!(matches!(
        decode(b"# .PCD v0.7"),
        Err(DecodeError::BadMagic { .. })
    ));
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn tagged_arbitrary_bytes_never_panic(tail in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut bytes = b"#RBF".to_vec();
        bytes.extend_from_slice(&tail);
        if let Ok(artifact) = decode(&bytes) {
            prop_assert!(!artifact.samples().is_empty());
            prop_assert!(!artifact.grid().is_empty());
        }
    }
}
