//! `zlaunch launch` – update if needed, then start the application.

use anyhow::Result;
use zlaunch_core::config::LauncherConfig;
use zlaunch_core::{Launcher, UpdateOutcome};

use crate::cli::console::ConsoleObserver;

pub fn run_launch(cfg: &LauncherConfig, skip_update: bool, launch: bool) -> Result<()> {
    let launcher = Launcher::new(cfg);
    let mut console = ConsoleObserver;

    if skip_update {
        tracing::info!("update check skipped (--skip-update)");
    } else {
        match launcher.check_for_update(&mut console)? {
            UpdateOutcome::SkippedLocked => {
                tracing::info!("executable busy, launching existing build");
            }
            UpdateOutcome::UpToDate { version } => {
                tracing::info!(%version, "no update needed");
            }
            UpdateOutcome::Updated {
                previous,
                installed,
                bytes,
            } => {
                tracing::info!(%previous, %installed, bytes, "update installed");
            }
        }
    }

    if !launch {
        tracing::info!("not starting application (--no-launch)");
        return Ok(());
    }

    let pid = launcher.start(&mut console)?;
    tracing::info!(pid, "launcher exiting");
    Ok(())
}
