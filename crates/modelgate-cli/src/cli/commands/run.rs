//! `modelgate run` – verify, then load the model.

use anyhow::Result;
use modelgate_core::{load_verified, RawModelLoader};
use std::path::Path;

pub async fn run_model(model: &Path, expected: &str) -> Result<()> {
    let verified = load_verified(model, expected, &RawModelLoader)?;
    println!("Model integrity verified. Safe to use.");
    println!(
        "Model loaded successfully ({} bytes). Ready for inference.",
        verified.model.size_bytes
    );
    tracing::info!(
        path = %model.display(),
        digest = %verified.digest,
        "model ready"
    );
    Ok(())
}
