//! Commands that do not need the config file.

use crate::cli::{Cli, CliCommand};
use clap::Parser;

fn cli_with_missing_config(dir: &tempfile::TempDir, rest: &[&str]) -> Cli {
    let config = dir.path().join("absent").join("config.toml");
    let config = config.to_str().unwrap().to_string();
    let mut args = vec!["modelgate", "--config", config.as_str()];
    args.extend_from_slice(rest);
    Cli::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn checksum_ignores_unreadable_config() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.onnx");
    std::fs::write(&model, b"abc").unwrap();

    let cli = cli_with_missing_config(&dir, &["checksum", model.to_str().unwrap()]);
    CliCommand::dispatch(cli).await.unwrap();
}

#[tokio::test]
async fn verify_still_requires_config() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.onnx");
    std::fs::write(&model, b"abc").unwrap();

    let cli = cli_with_missing_config(&dir, &["verify", "--model", model.to_str().unwrap()]);
    let err = CliCommand::dispatch(cli).await.unwrap_err();
    assert!(format!("{err:#}").contains("read config"));
}
