//! Compare a file's digest against a trusted reference value.

use std::path::Path;

use crate::checksum::{self, DigestError};
use crate::gate::GateError;

/// Outcome of checking one file against an expected digest.
#[derive(Debug)]
pub enum Verification {
    /// Digests match.
    Verified { digest: String },
    /// The file was read but its digest differs from the expected one.
    Mismatched { expected: String, actual: String },
    /// The file could not be opened or read.
    Unreadable { error: DigestError },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }

    /// The digest computed from the file, if it could be read.
    pub fn digest(&self) -> Option<&str> {
        match self {
            Verification::Verified { digest } => Some(digest),
            Verification::Mismatched { actual, .. } => Some(actual),
            Verification::Unreadable { .. } => None,
        }
    }

    /// Short label used in logs and API responses.
    pub fn label(&self) -> &'static str {
        match self {
            Verification::Verified { .. } => "verified",
            Verification::Mismatched { .. } => "mismatched",
            Verification::Unreadable { .. } => "unreadable",
        }
    }

    /// Turn the outcome into a `Result`, returning the verified digest on success.
    pub fn into_result(self) -> Result<String, GateError> {
        match self {
            Verification::Verified { digest } => Ok(digest),
            Verification::Mismatched { expected, actual } => {
                Err(GateError::Mismatched { expected, actual })
            }
            Verification::Unreadable { error } => Err(GateError::Unreadable(error)),
        }
    }
}

/// Hash `path` and compare it with `expected`.
///
/// `expected` is trimmed and lowercased before the comparison; it is not
/// checked for format, so a malformed value can only ever produce `Mismatched`.
pub fn verify(path: &Path, expected: &str) -> Verification {
    let expected = checksum::normalize(expected);
    let outcome = match checksum::compute_digest(path) {
        Ok(actual) if actual == expected => Verification::Verified { digest: actual },
        Ok(actual) => Verification::Mismatched { expected, actual },
        Err(error) => Verification::Unreadable { error },
    };
    log_outcome(path, &outcome);
    outcome
}

fn log_outcome(path: &Path, outcome: &Verification) {
    match outcome {
        Verification::Verified { digest } => {
            tracing::info!(path = %path.display(), %digest, "model integrity verified");
        }
        Verification::Mismatched { expected, actual } => {
            tracing::warn!(
                path = %path.display(),
                %expected,
                %actual,
                "model digest mismatch, possible tampering"
            );
        }
        Verification::Unreadable { error } => {
            tracing::error!(path = %path.display(), "cannot verify model: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn abc_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"abc").unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn round_trip_is_verified() {
        let f = abc_file();
        let digest = checksum::compute_digest(f.path()).unwrap();
        let outcome = verify(f.path(), &digest);
        assert!(outcome.is_verified());
        assert_eq!(outcome.digest(), Some(ABC));
        assert_eq!(outcome.into_result().unwrap(), ABC);
    }

    #[test]
    fn wrong_well_formed_digest_is_mismatched() {
        let f = abc_file();
        let wrong = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        match verify(f.path(), wrong) {
            Verification::Mismatched { expected, actual } => {
                assert_eq!(expected, wrong);
                assert_eq!(actual, ABC);
            }
            other => panic!("expected Mismatched, got {other:?}"),
        }
    }

    #[test]
    fn malformed_expected_never_matches() {
        let f = abc_file();
        let outcome = verify(f.path(), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(outcome.label(), "mismatched");
        assert!(verify(f.path(), "").digest().is_some());
        assert!(!verify(f.path(), "").is_verified());
    }

    #[test]
    fn expected_is_normalized() {
        let f = abc_file();
        let upper = format!(" {} ", ABC.to_ascii_uppercase());
        assert!(verify(f.path(), &upper).is_verified());
    }

    #[test]
    fn missing_file_is_unreadable_not_mismatched() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = verify(&dir.path().join("nope.onnx"), ABC);
        assert_eq!(outcome.label(), "unreadable");
        assert!(outcome.digest().is_none());
        assert!(matches!(
            outcome.into_result(),
            Err(GateError::Unreadable(_))
        ));
    }

    #[test]
    fn verify_does_not_modify_file() {
        let f = abc_file();
        let before = std::fs::metadata(f.path()).unwrap().modified().unwrap();
        let _ = verify(f.path(), ABC);
        let after = std::fs::metadata(f.path()).unwrap().modified().unwrap();
        assert_eq!(before, after);
        assert_eq!(std::fs::read(f.path()).unwrap(), b"abc");
    }
}
