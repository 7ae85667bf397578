//! SHA-256 digests of model files.
//!
//! Files are streamed through the hasher in fixed-size chunks so memory use
//! stays bounded no matter how large the model is.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Read buffer size used when hashing files.
pub const CHUNK_SIZE: usize = 4096;

/// Length of a SHA-256 digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// The file could not be opened or read to the end.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DigestError {
    pub fn path(&self) -> &Path {
        match self {
            DigestError::Unreadable { path, .. } => path,
        }
    }

    /// True when the file simply does not exist (as opposed to e.g. permission denied).
    pub fn is_not_found(&self) -> bool {
        match self {
            DigestError::Unreadable { source, .. } => source.kind() == io::ErrorKind::NotFound,
        }
    }
}

/// Hash everything `reader` yields, reading at most `chunk_size` bytes at a time.
/// Returns the digest as lowercase hex.
pub fn sha256_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// The file is opened read-only and never modified.
pub fn compute_digest(path: &Path) -> Result<String, DigestError> {
    let unreadable = |source| DigestError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let f = File::open(path).map_err(unreadable)?;
    sha256_reader(f, CHUNK_SIZE).map_err(unreadable)
}

pub use compute_digest as sha256_path;

/// True if `digest` looks like a SHA-256 hex digest (64 hex digits, either case).
pub fn is_well_formed(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN && digest.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Canonical form of a digest supplied from outside: trimmed and lowercased.
pub fn normalize(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}
