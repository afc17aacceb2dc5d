//! CLI for the zlaunch self-updating launcher.

mod commands;
mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use zlaunch_core::config::{self, LauncherConfig};

use commands::{run_launch, run_status};

/// Top-level CLI for the zlaunch launcher.
#[derive(Debug, Parser)]
#[command(name = "zlaunch")]
#[command(
    about = "zlaunch: update the managed application from its release feed, then start it",
    long_about = None
)]
pub struct Cli {
    /// Load configuration from this TOML file instead of ~/.config/zlaunch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// On failure, exit immediately instead of waiting for Enter.
    #[arg(long, global = true)]
    pub no_pause: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Check for an update, install it, then start the application (default).
    Launch {
        /// Start the installed executable without contacting the release feed.
        #[arg(long)]
        skip_update: bool,
        /// Run the update check only; do not start the application.
        #[arg(long)]
        no_launch: bool,
    },

    /// Show the installed and latest release names without changing anything.
    Status,
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Launch {
            skip_update: false,
            no_launch: false,
        }
    }
}

impl Cli {
    /// Command to run; a bare `zlaunch` means `zlaunch launch`.
    pub fn command(&self) -> CliCommand {
        self.command.clone().unwrap_or_default()
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = load_config(self.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command() {
            CliCommand::Launch {
                skip_update,
                no_launch,
            } => run_launch(&cfg, skip_update, !no_launch)?,
            CliCommand::Status => run_status(&cfg)?,
        }

        Ok(())
    }
}

/// Load, validate, and anchor relative paths at the working directory.
fn load_config(path: Option<&Path>) -> Result<LauncherConfig> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    cfg.validate()?;
    let cwd = std::env::current_dir()?;
    Ok(cfg.resolve_paths(&cwd))
}

/// Parse arguments and run; see [`run`].
pub fn run_from_args() -> i32 {
    run(Cli::parse())
}

/// Run `cli` and map the result to a process exit status.
/// Any failure is reported once here; the operator acknowledges it before exit.
pub fn run(cli: Cli) -> i32 {
    match cli.execute() {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("{:#}", err);
            console::report_failure(&err, !cli.no_pause);
            1
        }
    }
}
