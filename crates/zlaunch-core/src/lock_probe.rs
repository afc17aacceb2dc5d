//! Exclusive-open probe on the managed executable.
//!
//! Best effort: the answer can be stale by the time the download opens the
//! same path. A locked executable is a signal to skip the update, not an error.

use std::fs::File;
use std::io;
use std::path::Path;

/// True if another process currently holds `path` open exclusively.
/// A missing file is never locked.
pub fn is_target_locked(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match try_exclusive_open(path) {
        Ok(()) => false,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "executable is in use");
            true
        }
    }
}

/// Open read-write with no sharing, then release immediately.
#[cfg(windows)]
fn try_exclusive_open(path: &Path) -> io::Result<()> {
    use std::os::windows::fs::OpenOptionsExt;
    let _file = File::options()
        .read(true)
        .write(true)
        .share_mode(0)
        .open(path)?;
    Ok(())
}

/// Open read-write and take a non-blocking exclusive `flock`.
/// Opening a running binary for writing fails with `ETXTBSY`, which also counts as locked.
#[cfg(unix)]
fn try_exclusive_open(path: &Path) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let file = File::options().read(true).write(true).open(path)?;
    let fd = file.as_raw_fd();
    let r = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if r != 0 {
        return Err(io::Error::last_os_error());
    }
    unsafe { libc::flock(fd, libc::LOCK_UN) };
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn try_exclusive_open(path: &Path) -> io::Result<()> {
    File::options().read(true).write(true).open(path).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_locked() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_target_locked(&dir.path().join("zed")));
    }

    #[test]
    fn idle_file_is_not_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zed");
        std::fs::write(&path, b"binary").unwrap();
        assert!(!is_target_locked(&path));
        // Probe must release: a second probe sees the same answer.
        assert!(!is_target_locked(&path));
    }

    #[cfg(unix)]
    #[test]
    fn flocked_file_is_locked() {
        use std::os::unix::io::AsRawFd;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zed");
        std::fs::write(&path, b"binary").unwrap();

        let holder = File::options().read(true).write(true).open(&path).unwrap();
        let r = unsafe { libc::flock(holder.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        assert_eq!(r, 0);
        assert!(is_target_locked(&path));

        drop(holder);
        assert!(!is_target_locked(&path));
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_file_counts_as_locked() {
        use std::os::unix::fs::PermissionsExt;
        if unsafe { libc::geteuid() } == 0 {
            return; // root ignores permission bits
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zed");
        std::fs::write(&path, b"binary").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();
        assert!(is_target_locked(&path));
    }
}
