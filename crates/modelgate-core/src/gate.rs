//! Load gating: a model is only handed to a loader after its digest matches.

use std::path::Path;
use thiserror::Error;

use crate::checksum::DigestError;
use crate::loader::{LoaderError, ModelLoader};
use crate::verify::verify;

/// Why a gated load was refused.
///
/// The three cases need different remediation: a mismatch means the artifact
/// must not be trusted, an unreadable file is an operational problem, and a
/// loader failure means the file is authentic but unusable.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("model integrity check failed: {0}")]
    Unreadable(#[source] DigestError),

    #[error("model integrity check failed, possible tampering detected (expected {expected}, got {actual})")]
    Mismatched { expected: String, actual: String },

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

impl GateError {
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Unreadable(_) => "unreadable",
            GateError::Mismatched { .. } => "mismatched",
            GateError::Loader(_) => "loader",
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            GateError::Mismatched { .. } => 2,
            GateError::Unreadable(_) => 3,
            GateError::Loader(_) => 4,
        }
    }
}

/// A model that passed the integrity check and was loaded.
#[derive(Debug)]
pub struct Verified<M> {
    pub digest: String,
    pub model: M,
}

/// Verify `path` against `expected`, then load it with `loader`.
/// The loader is never called unless verification succeeds.
pub fn load_verified<L: ModelLoader + ?Sized>(
    path: &Path,
    expected: &str,
    loader: &L,
) -> Result<Verified<L::Model>, GateError> {
    let digest = verify(path, expected).into_result()?;
    let model = loader.load(path).map_err(|e| {
        tracing::error!(path = %path.display(), "model load failed: {}", e);
        GateError::Loader(e)
    })?;
    Ok(Verified { digest, model })
}
