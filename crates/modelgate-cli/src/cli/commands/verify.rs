//! `modelgate verify` – check a model against the expected digest without loading it.

use anyhow::Result;
use modelgate_core::verify;
use std::path::Path;

pub async fn run_verify(model: &Path, expected: &str) -> Result<()> {
    let digest = verify(model, expected).into_result()?;
    println!("Model integrity verified. Safe to use.");
    println!("{}  {}", digest, model.display());
    Ok(())
}
