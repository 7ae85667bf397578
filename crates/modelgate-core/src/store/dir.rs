//! Directory-backed artifact store.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{sanitize_file_name, staging_path, ArtifactStore, Staged, StoreError, TEMP_SUFFIX};

/// Stores each artifact as a plain file directly under `root`.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
    /// Distinguishes staging files of concurrent uploads under the same name.
    seq: AtomicU64,
}

impl DirStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        tracing::debug!(root = %root.display(), "artifact store ready");
        Ok(Self {
            root,
            seq: AtomicU64::new(0),
        })
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn remove_if_present(path: &Path) -> Result<bool, StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(path)(e)),
    }
}

impl ArtifactStore for DirStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let clean = sanitize_file_name(name);
        if clean.is_empty() || clean.ends_with(TEMP_SUFFIX) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(clean))
    }

    /// Writes to `<name>.<seq>.part` and syncs. The final name is not touched.
    fn stage(&self, name: &str, bytes: &[u8]) -> Result<Staged, StoreError> {
        let final_path = self.path_for(name)?;
        let tmp = staging_path(&final_path, self.seq.fetch_add(1, Ordering::Relaxed));

        let write = || -> io::Result<()> {
            let mut f = File::options().write(true).create_new(true).open(&tmp)?;
            f.write_all(bytes)?;
            f.sync_all()
        };
        if let Err(e) = write() {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&tmp)(e));
        }

        let file_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(path = %tmp.display(), size = bytes.len(), "artifact staged");
        Ok(Staged::new(file_name, tmp, final_path))
    }

    fn commit(&self, staged: Staged) -> Result<PathBuf, StoreError> {
        let final_path = staged.final_path().to_path_buf();
        if let Err(e) = std::fs::rename(staged.path(), &final_path) {
            let _ = std::fs::remove_file(staged.path());
            return Err(io_err(&final_path)(e));
        }
        tracing::debug!(path = %final_path.display(), "artifact stored");
        Ok(final_path)
    }

    fn discard(&self, staged: Staged) -> Result<(), StoreError> {
        if remove_if_present(staged.path())? {
            tracing::debug!(path = %staged.path().display(), "staged artifact discarded");
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if remove_if_present(&path)? {
            tracing::debug!(path = %path.display(), "artifact deleted");
        }
        Ok(())
    }
}
