use modelgate_core::logging;

mod cli;

use crate::cli::{exit_code, CliCommand};

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("modelgate error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}
