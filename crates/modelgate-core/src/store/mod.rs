//! Artifact storage for uploaded model files.
//!
//! The HTTP service persists uploads through an `ArtifactStore` so the
//! integrity logic can be exercised against any backing storage. Uploads are
//! staged first and only committed under their final name once verified, so
//! a rejected upload never replaces an artifact that is already stored.

mod dir;
mod sanitize;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use dir::DirStore;
pub use sanitize::sanitize_file_name;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Linux NAME_MAX.
pub const NAME_MAX: usize = 255;

/// Longest stored name. Leaves room for the `.<seq>.part` staging suffix.
pub const MAX_NAME_LEN: usize = NAME_MAX - 24;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),

    #[error("storage I/O on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An upload written to a staging file, not yet visible under its final name.
#[derive(Debug)]
pub struct Staged {
    name: String,
    staging_path: PathBuf,
    final_path: PathBuf,
}

impl Staged {
    pub fn new(name: String, staging_path: PathBuf, final_path: PathBuf) -> Self {
        Self {
            name,
            staging_path,
            final_path,
        }
    }

    /// Sanitized artifact name the upload will be committed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Staging file holding the bytes; verify this before committing.
    pub fn path(&self) -> &Path {
        &self.staging_path
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }
}

/// Named artifacts kept under a single root.
///
/// Names are client-facing and must be sanitized by the implementation; the
/// returned paths always lie directly under `root()`.
pub trait ArtifactStore: Send + Sync {
    fn root(&self) -> &Path;

    /// Path the artifact `name` is (or would be) stored at.
    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError>;

    /// Write `bytes` to a fresh staging file for `name`. Existing artifacts are untouched.
    fn stage(&self, name: &str, bytes: &[u8]) -> Result<Staged, StoreError>;

    /// Move a staged upload to its final name, replacing any existing artifact.
    fn commit(&self, staged: Staged) -> Result<PathBuf, StoreError>;

    /// Drop a staged upload without touching the artifact under its final name.
    fn discard(&self, staged: Staged) -> Result<(), StoreError>;

    /// Remove `name`. Removing an artifact that does not exist is not an error.
    fn delete(&self, name: &str) -> Result<(), StoreError>;

    /// Stage and commit in one step. Returns the final path.
    fn persist(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let staged = self.stage(name, bytes)?;
        self.commit(staged)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(name)?.is_file())
    }
}

/// Staging path for `final_path`: appends `.<seq>.part` (e.g. `m.onnx` → `m.onnx.1f.part`).
pub fn staging_path(final_path: &Path, seq: u64) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{seq:x}{TEMP_SUFFIX}"));
    PathBuf::from(o)
}
