pub mod config;
pub mod logging;

pub mod downloader;
pub mod error;
pub mod http;
pub mod launcher;
pub mod lock_probe;
pub mod process;
pub mod release;
pub mod version_store;

pub use error::{ErrorKind, LaunchError};
pub use launcher::{LaunchObserver, Launcher, Stage, UpdateOutcome, VersionStatus};
pub use version_store::Version;
