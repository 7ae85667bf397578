use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum;

/// Default request body limit for uploads (512 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Global configuration loaded from `~/.config/modelgate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelGateConfig {
    /// Model file checked and loaded by `modelgate run`.
    pub model_path: PathBuf,
    /// Trusted SHA-256 of the model (64 hex characters). There is no built-in default.
    #[serde(default)]
    pub expected_digest: Option<String>,
    /// Directory uploaded models are stored in.
    pub model_dir: PathBuf,
    /// Address the HTTP service binds to.
    pub listen_addr: String,
    /// Largest accepted upload body in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ModelGateConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.onnx"),
            expected_digest: None,
            model_dir: PathBuf::from("models"),
            listen_addr: "0.0.0.0:8000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ModelGateConfig {
    /// The configured digest, normalized. Logs a warning if it cannot be a
    /// SHA-256 value; such a digest will never verify anything.
    pub fn expected_digest(&self) -> Option<String> {
        let raw = self.expected_digest.as_deref()?;
        let digest = checksum::normalize(raw);
        if !checksum::is_well_formed(&digest) {
            tracing::warn!(
                digest = %digest,
                "configured expected_digest is not a 64-character hex SHA-256 value"
            );
        }
        Some(digest)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelgate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ModelGateConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ModelGateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<ModelGateConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ModelGateConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
