//! # Model Upload
//!
//! Stages an uploaded model, checks its digest against the server's
//! expected value, and only stores it under its name when the check passes.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use modelgate_core::{verify, ArtifactStore, Verification};

use crate::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the model file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub path: String,
    pub hash: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload/", post(upload_model))
}

async fn upload_model(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (name, bytes) = read_file_field(&mut multipart).await?;
    tracing::info!(file_name = %name, size = bytes.len(), "model upload received");

    let store = state.store.clone();
    let expected = state.config.expected_digest.clone();
    let resp =
        tokio::task::spawn_blocking(move || store_and_verify(store.as_ref(), &name, &bytes, &expected))
            .await??;
    Ok(Json(resp))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("file field has no filename".to_string()))?;
        let bytes = field.bytes().await?;
        return Ok((name, bytes));
    }
    Err(AppError::Validation(format!(
        "missing multipart field `{FILE_FIELD}`"
    )))
}

/// Stage the upload, verify the staged copy, and commit it under its final
/// name only when it verified. A rejected upload never replaces a stored one.
fn store_and_verify(
    store: &dyn ArtifactStore,
    name: &str,
    bytes: &[u8],
    expected: &str,
) -> Result<UploadResponse, AppError> {
    let staged = store.stage(name, bytes)?;
    let file_name = staged.name().to_string();

    match verify(staged.path(), expected) {
        Verification::Verified { digest } => {
            let path = store.commit(staged)?;
            Ok(UploadResponse {
                message: "Model uploaded successfully!".to_string(),
                file_name,
                path: path.display().to_string(),
                hash: digest,
            })
        }
        Verification::Mismatched { .. } => {
            store.discard(staged)?;
            tracing::warn!(file_name = %file_name, "rejected upload discarded");
            Err(AppError::tampered())
        }
        Verification::Unreadable { error } => {
            if let Err(e) = store.discard(staged) {
                tracing::warn!(file_name = %file_name, "could not remove unverified upload: {}", e);
            }
            Err(AppError::Internal(format!(
                "staged upload could not be verified: {error}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_core::checksum::compute_digest;
    use modelgate_core::DirStore;

    #[test]
    fn verified_upload_stays() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        let scratch = dir.path().join("scratch");
        std::fs::write(&scratch, b"weights").unwrap();
        let expected = compute_digest(&scratch).unwrap();

        let resp = store_and_verify(&store, "m.onnx", b"weights", &expected).unwrap();
        assert_eq!(resp.file_name, "m.onnx");
        assert_eq!(resp.hash, expected);
        assert_eq!(resp.path, dir.path().join("m.onnx").display().to_string());
        assert!(dir.path().join("m.onnx").exists());
    }

    #[test]
    fn mismatched_upload_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        let err = store_and_verify(&store, "m.onnx", b"weights", &"0".repeat(64)).unwrap_err();
        assert_eq!(err.kind(), "integrity");
        assert!(!dir.path().join("m.onnx").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn mismatched_upload_keeps_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        store_and_verify(&store, "m.onnx", b"abc", expected).unwrap();

        let err = store_and_verify(&store, "m.onnx", b"tampered", expected).unwrap_err();
        assert_eq!(err.kind(), "integrity");
        assert_eq!(std::fs::read(dir.path().join("m.onnx")).unwrap(), b"abc");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn sanitized_name_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        let resp = store_and_verify(&store, "../abc.onnx", b"abc", expected).unwrap();
        assert_eq!(resp.file_name, "abc.onnx");
    }
}
