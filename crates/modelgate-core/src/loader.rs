//! Model loading collaborator.
//!
//! The gate never parses model formats itself; it hands a verified path to a
//! `ModelLoader`. Real inference runtimes plug in behind the trait.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Loader failure on a file that already passed the integrity check.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed model {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Something that turns a model file into a ready-to-use model.
pub trait ModelLoader: Send + Sync {
    type Model;

    fn load(&self, path: &Path) -> Result<Self::Model, LoaderError>;
}

/// Model bytes held in memory, ready to hand to an inference runtime.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

/// Default loader: reads the file into memory and rejects empty models.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawModelLoader;

impl ModelLoader for RawModelLoader {
    type Model = LoadedModel;

    fn load(&self, path: &Path) -> Result<LoadedModel, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(LoaderError::Malformed {
                path: path.to_path_buf(),
                reason: "model file is empty".to_string(),
            });
        }
        tracing::debug!(path = %path.display(), size = bytes.len(), "model loaded");
        Ok(LoadedModel {
            path: path.to_path_buf(),
            size_bytes: bytes.len() as u64,
            bytes,
        })
    }
}
