//! Directory creation that tolerates concurrent creators.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{DirSyncError, Result};
use crate::platform::is_writable;

/// Create `path` and any missing parents.
///
/// - An existing directory must be writable, else `DestinationNotWritable`.
/// - If `create_dir` fails but the directory now exists and is writable, another
///   process won the race and this counts as success.
/// - Otherwise `CreateDirFailure` when the parent is writable, `ParentNotWritable` when not.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        if !is_writable(path) {
            return Err(DirSyncError::DestinationNotWritable(path.to_path_buf()));
        }
        return Ok(());
    }
    create_chain(path)
}

fn create_chain(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_chain(parent)?;
    }

    match fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(_) if path.is_dir() && is_writable(path) => {
            debug!(path = %path.display(), "directory created concurrently");
            Ok(())
        }
        Err(source) => {
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            if is_writable(parent) {
                Err(DirSyncError::CreateDirFailure {
                    path: path.to_path_buf(),
                    source,
                })
            } else {
                Err(DirSyncError::ParentNotWritable {
                    path: path.to_path_buf(),
                    parent: parent.to_path_buf(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_missing_parents() {
        let dir = tempdir().unwrap();
        let deep = dir.path().join("a").join("b").join("c");
        ensure_dir(&deep).unwrap();
        assert!(deep.is_dir());
        // Second call is a no-op.
        ensure_dir(&deep).unwrap();
    }

    #[test]
    fn file_in_the_way_is_create_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let err = ensure_dir(&blocker).unwrap_err();
        assert!(matches!(err, DirSyncError::CreateDirFailure { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn readonly_parent_is_reported() {
        use std::os::unix::fs::PermissionsExt;
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping: running as root");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("ro");
        fs::create_dir(&parent).unwrap();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o555)).unwrap();

        let err = ensure_dir(&parent.join("child")).unwrap_err();
        let existing = ensure_dir(&parent).unwrap_err();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(err, DirSyncError::ParentNotWritable { .. }), "{err:?}");
        assert!(matches!(existing, DirSyncError::DestinationNotWritable(_)), "{existing:?}");
    }
}
