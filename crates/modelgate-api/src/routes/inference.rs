//! # Inference
//!
//! Loads a previously uploaded model. The stored file is verified again
//! before the loader sees it, since it may have changed on disk since upload.

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use modelgate_core::{load_verified, GateError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InferenceParams {
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub message: String,
    pub file_name: String,
    pub hash: String,
    pub size_bytes: u64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/inference/", post(run_inference))
}

async fn run_inference(
    State(state): State<AppState>,
    Query(params): Query<InferenceParams>,
) -> Result<Json<InferenceResponse>, AppError> {
    let resp = tokio::task::spawn_blocking(move || load_stored(&state, &params.file_name)).await??;
    Ok(Json(resp))
}

fn load_stored(state: &AppState, file_name: &str) -> Result<InferenceResponse, AppError> {
    let path = state.store.path_for(file_name)?;
    if !path.is_file() {
        return Err(AppError::NotFound("Model file not found.".to_string()));
    }

    match load_verified(&path, &state.config.expected_digest, state.loader.as_ref()) {
        Ok(v) => Ok(InferenceResponse {
            message: "Model loaded successfully. Ready for inference.".to_string(),
            file_name: file_name.to_string(),
            hash: v.digest,
            size_bytes: v.model.size_bytes,
        }),
        Err(e @ GateError::Mismatched { .. }) => {
            state.store.delete(file_name)?;
            tracing::warn!(file_name = %file_name, "stored model no longer matches, deleted");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
