//! Local version marker: a plain-text file holding the last installed release name.

use crate::error::LaunchError;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Opaque release identifier. Compared as raw text, never parsed as semver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Sentinel for "no local record". Never equal to a real release name,
    /// so the first run always updates.
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(raw: impl Into<String>) -> Self {
        Version(raw.into())
    }

    pub fn unknown() -> Self {
        Version(Self::UNKNOWN.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::new(s)
    }
}

/// Reads and writes the version marker file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Marker contents verbatim, or [`Version::UNKNOWN`] when the file is absent.
    /// Invalid UTF-8 is decoded lossily; only OS errors on an existing file fail.
    pub fn read(&self) -> Result<Version, LaunchError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                tracing::debug!(path = %self.path.display(), version = %text, "read version marker");
                Ok(Version(text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no version marker");
                Ok(Version::unknown())
            }
            Err(e) => Err(LaunchError::io("read", &self.path, e)),
        }
    }

    /// Overwrite the marker with exactly `version` (no trailing newline).
    pub fn write(&self, version: &Version) -> Result<(), LaunchError> {
        fs::write(&self.path, version.as_str()).map_err(|e| LaunchError::io("write", &self.path, e))?;
        tracing::info!(path = %self.path.display(), version = %version, "version marker updated");
        Ok(())
    }
}
