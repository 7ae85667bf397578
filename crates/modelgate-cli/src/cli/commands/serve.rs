//! `modelgate serve` – run the upload/inference HTTP API.

use anyhow::Result;
use modelgate_api::{ApiConfig, AppState};
use modelgate_core::{DirStore, RawModelLoader};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub listen: String,
    pub model_dir: PathBuf,
    pub expected_digest: String,
    pub max_upload_bytes: usize,
}

pub async fn run_serve(opts: ServeOptions) -> Result<()> {
    let store = DirStore::open(&opts.model_dir)?;
    let config = ApiConfig {
        expected_digest: opts.expected_digest,
        max_upload_bytes: opts.max_upload_bytes,
    };
    tracing::info!(
        model_dir = %opts.model_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "starting API"
    );
    let state = AppState::new(config, Arc::new(store), Arc::new(RawModelLoader));
    modelgate_api::serve(&opts.listen, state).await
}
