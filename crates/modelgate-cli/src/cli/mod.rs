//! CLI for the modelgate integrity verifier.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use modelgate_core::config::{self, ModelGateConfig};
use modelgate_core::GateError;
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_model, run_serve, run_verify, ServeOptions};

/// Top-level CLI for modelgate.
#[derive(Debug, Parser)]
#[command(name = "modelgate")]
#[command(about = "modelgate: refuse to load model files whose SHA-256 does not match", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/modelgate/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Check a model file against the expected digest.
    Verify {
        /// Model file (defaults to `model_path` from config).
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,
        /// Expected SHA-256 (defaults to `expected_digest` from config).
        #[arg(long, value_name = "HEX")]
        expected: Option<String>,
    },

    /// Verify a model file and load it only if it matches.
    Run {
        /// Model file (defaults to `model_path` from config).
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,
        /// Expected SHA-256 (defaults to `expected_digest` from config).
        #[arg(long, value_name = "HEX")]
        expected: Option<String>,
    },

    /// Serve the upload/inference HTTP API.
    Serve {
        /// Address to bind (defaults to `listen_addr` from config).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
        /// Directory uploaded models are stored in (defaults to `model_dir` from config).
        #[arg(long, value_name = "DIR")]
        model_dir: Option<PathBuf>,
        /// Expected SHA-256 every upload must match.
        #[arg(long, value_name = "HEX")]
        expected: Option<String>,
    },

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

/// Expected digest from the command line, falling back to config.
fn resolve_expected(flag: Option<String>, cfg: &ModelGateConfig) -> Result<String> {
    if let Some(d) = flag {
        return Ok(modelgate_core::checksum::normalize(&d));
    }
    cfg.expected_digest().context(
        "no expected digest: pass --expected or set expected_digest in the config file",
    )
}

fn load_config(path: Option<&PathBuf>) -> Result<ModelGateConfig> {
    match path {
        Some(p) => config::load_from(p),
        None => config::load_or_init(),
    }
}

/// Process exit code for a failed command: the `GateError` code when the
/// failure was an integrity or load refusal, 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GateError>()
        .map(GateError::exit_code)
        .unwrap_or(1)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        Self::dispatch(Cli::parse()).await
    }

    async fn dispatch(cli: Cli) -> Result<()> {
        // Commands that need no configuration must work without a config file.
        match &cli.command {
            CliCommand::Completions { shell } => {
                run_completions(*shell);
                return Ok(());
            }
            CliCommand::Checksum { path } => return run_checksum(path).await,
            _ => {}
        }

        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Verify { model, expected } => {
                let model = model.unwrap_or_else(|| cfg.model_path.clone());
                let expected = resolve_expected(expected, &cfg)?;
                run_verify(&model, &expected).await?;
            }
            CliCommand::Run { model, expected } => {
                let model = model.unwrap_or_else(|| cfg.model_path.clone());
                let expected = resolve_expected(expected, &cfg)?;
                run_model(&model, &expected).await?;
            }
            CliCommand::Serve {
                listen,
                model_dir,
                expected,
            } => {
                let opts = ServeOptions {
                    listen: listen.unwrap_or_else(|| cfg.listen_addr.clone()),
                    model_dir: model_dir.unwrap_or_else(|| cfg.model_dir.clone()),
                    expected_digest: resolve_expected(expected, &cfg)?,
                    max_upload_bytes: cfg.max_upload_bytes,
                };
                run_serve(opts).await?;
            }
            CliCommand::Checksum { .. } | CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
