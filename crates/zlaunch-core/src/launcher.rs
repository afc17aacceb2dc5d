//! Launcher orchestration: lock check, version compare, download, persist, start.
//!
//! ```text
//! CheckingLock ─locked──────────────────────────────────────┐
//!      │ unlocked                                           │
//! CheckingVersion ─equal (UpToDate)─────────────────────────┤
//!      │ different                                          ▼
//! Downloading ──> Persisting ───────────────────────────> Starting
//! ```
//!
//! Every step runs on the calling thread, one after another. A failure in any
//! step before `Starting` aborts the run; the error carries the stage it came
//! from so the CLI can print one uniform report.

use crate::config::LauncherConfig;
use crate::downloader::Downloader;
use crate::lock_probe;
use crate::process;
use crate::release::ReleaseClient;
use crate::version_store::{Version, VersionStore};
use anyhow::{Context, Result};
use std::fmt;

/// Step of a launcher run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CheckingLock,
    CheckingVersion,
    Downloading,
    Persisting,
    Starting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::CheckingLock => "checking lock",
            Stage::CheckingVersion => "checking version",
            Stage::Downloading => "downloading",
            Stage::Persisting => "persisting version",
            Stage::Starting => "starting",
        };
        f.write_str(s)
    }
}

/// Observation port for a run. The CLI prints; tests record.
pub trait LaunchObserver {
    fn on_stage(&mut self, _stage: Stage) {}
    fn on_update_available(&mut self, _local: &Version, _remote: &Version) {}
    /// Download percentage; only called when the server declares a length.
    fn on_progress(&mut self, _percent: u32) {}
    fn on_downloaded(&mut self, _version: &Version) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl LaunchObserver for SilentObserver {}

/// What the update phase did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Executable held by another process; update not attempted.
    SkippedLocked,
    /// Local marker matches the newest release.
    UpToDate { version: Version },
    /// New executable written and marker updated.
    Updated {
        previous: Version,
        installed: Version,
        bytes: u64,
    },
}

/// Local and remote versions side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStatus {
    pub local: Version,
    pub remote: Version,
}

impl VersionStatus {
    /// Raw text comparison: any difference means update.
    pub fn update_available(&self) -> bool {
        self.local != self.remote
    }
}

fn failed_while(stage: Stage) -> String {
    format!("update failed while {}", stage)
}

pub struct Launcher<'a> {
    cfg: &'a LauncherConfig,
    store: VersionStore,
    releases: ReleaseClient,
    downloader: Downloader,
}

impl<'a> Launcher<'a> {
    pub fn new(cfg: &'a LauncherConfig) -> Self {
        Self {
            cfg,
            store: VersionStore::new(&cfg.version_marker_path),
            releases: ReleaseClient::new(cfg),
            downloader: Downloader::new(cfg),
        }
    }

    /// Read the local marker and fetch the newest release name.
    pub fn status(&self) -> Result<VersionStatus> {
        let local = self
            .store
            .read()
            .with_context(|| failed_while(Stage::CheckingVersion))?;
        let remote = self
            .releases
            .fetch_latest_version()
            .with_context(|| failed_while(Stage::CheckingVersion))?;
        Ok(VersionStatus { local, remote })
    }

    /// Run the update phase. Does not start the application.
    pub fn check_for_update(&self, observer: &mut dyn LaunchObserver) -> Result<UpdateOutcome> {
        let executable = &self.cfg.executable_path;

        observer.on_stage(Stage::CheckingLock);
        if lock_probe::is_target_locked(executable) {
            tracing::info!(
                path = %executable.display(),
                "executable in use, skipping update check"
            );
            return Ok(UpdateOutcome::SkippedLocked);
        }

        observer.on_stage(Stage::CheckingVersion);
        let VersionStatus { local, remote } = self.status()?;
        if local == remote {
            tracing::info!(version = %local, "already up to date");
            return Ok(UpdateOutcome::UpToDate { version: local });
        }
        tracing::info!(current = %local, available = %remote, "update available");
        observer.on_update_available(&local, &remote);

        observer.on_stage(Stage::Downloading);
        let bytes = {
            let mut report = |pct: u32| observer.on_progress(pct);
            self.downloader
                .download(executable, Some(&mut report))
                .with_context(|| failed_while(Stage::Downloading))?
        };
        observer.on_downloaded(&remote);

        observer.on_stage(Stage::Persisting);
        self.store
            .write(&remote)
            .with_context(|| failed_while(Stage::Persisting))?;

        Ok(UpdateOutcome::Updated {
            previous: local,
            installed: remote,
            bytes,
        })
    }

    /// Spawn the managed executable detached and return its pid.
    pub fn start(&self, observer: &mut dyn LaunchObserver) -> Result<u32> {
        observer.on_stage(Stage::Starting);
        process::spawn_detached(&self.cfg.executable_path)
    }
}
