//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod run;
mod serve;
mod verify;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use run::run_model;
pub use serve::{run_serve, ServeOptions};
pub use verify::run_verify;
