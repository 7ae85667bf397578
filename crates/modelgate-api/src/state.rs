//! # Application State
//!
//! Everything a handler needs is passed in here explicitly; there is no
//! process-wide configuration.

use std::sync::Arc;

use modelgate_core::config::DEFAULT_MAX_UPLOAD_BYTES;
use modelgate_core::{ArtifactStore, LoadedModel, ModelLoader};

/// Settings the HTTP service needs from the wider configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Trusted digest every uploaded model must match (already normalized).
    pub expected_digest: String,
    pub max_upload_bytes: usize,
}

impl ApiConfig {
    pub fn new(expected_digest: impl Into<String>) -> Self {
        let digest: String = expected_digest.into();
        Self {
            expected_digest: modelgate_core::checksum::normalize(&digest),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

pub type SharedLoader = Arc<dyn ModelLoader<Model = LoadedModel>>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn ArtifactStore>,
    pub loader: SharedLoader,
}

impl AppState {
    pub fn new(config: ApiConfig, store: Arc<dyn ArtifactStore>, loader: SharedLoader) -> Self {
        Self {
            config,
            store,
            loader,
        }
    }
}
