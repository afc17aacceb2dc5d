//! CLI command handlers. Each command is in its own file.

mod launch;
mod status;

pub use launch::run_launch;
pub use status::run_status;
