//! Detached start of the managed application.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Start `executable` as an independent process and return its pid.
///
/// Environment and working directory are inherited. The child is never
/// waited on; dropping the handle leaves it running after the launcher exits.
pub fn spawn_detached(executable: &Path) -> Result<u32> {
    let child = Command::new(executable)
        .spawn()
        .with_context(|| format!("failed to start {}", executable.display()))?;
    let pid = child.id();
    tracing::info!(path = %executable.display(), pid, "application started");
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-there");
        let err = spawn_detached(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("not-there"));
    }

    #[cfg(unix)]
    #[test]
    fn spawns_without_waiting() {
        let pid = spawn_detached(Path::new("/bin/true")).unwrap();
        assert!(pid > 0);
    }
}
