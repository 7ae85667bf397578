//! Integration test: gated loading through the public API, including
//! independent verifications running in parallel.

use modelgate_core::checksum::compute_digest;
use modelgate_core::{load_verified, verify, ArtifactStore, DirStore, GateError, RawModelLoader};
use std::thread;
use tempfile::tempdir;

#[test]
fn stored_model_round_trip() {
    let dir = tempdir().unwrap();
    let store = DirStore::open(dir.path().join("models")).unwrap();
    let body: Vec<u8> = (0u8..100).cycle().take(64 * 1024).collect();
    let path = store.persist("model.onnx", &body).unwrap();

    let expected = compute_digest(&path).unwrap();
    let v = load_verified(&path, &expected, &RawModelLoader).unwrap();
    assert_eq!(v.model.bytes, body);
    assert_eq!(v.digest, expected);
}

#[test]
fn parallel_verifications_are_independent() {
    let dir = tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();

    let mut cases = Vec::new();
    for i in 0..8u8 {
        let body = vec![i; 10_000 + i as usize];
        let path = store.persist(&format!("m{i}.onnx"), &body).unwrap();
        let digest = compute_digest(&path).unwrap();
        cases.push((path, digest));
    }

    let handles: Vec<_> = cases
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, (path, digest))| {
            thread::spawn(move || {
                // Odd workers check against the wrong digest.
                let expected = if i % 2 == 0 { digest } else { "f".repeat(64) };
                verify(&path, &expected).is_verified()
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap(), i % 2 == 0, "worker {i}");
    }
}

#[test]
fn tampering_after_digest_is_recorded_is_caught() {
    let dir = tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let path = store.persist("model.onnx", b"trusted weights").unwrap();
    let expected = compute_digest(&path).unwrap();

    store.persist("model.onnx", b"trusted weightz").unwrap();

    match load_verified(&path, &expected, &RawModelLoader) {
        Err(GateError::Mismatched { expected: e, actual }) => {
            assert_eq!(e, expected);
            assert_ne!(actual, expected);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}
