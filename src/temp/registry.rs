//! Process-lifetime tracking of temporary paths.
//! Every path registered here is removed once, when the owning process shuts down.
//!
//! Notes:
//! - The registry is an explicit object shared by `Arc`; the entry point owns it.
//! - A `Mutex` guards the state only so the interrupt handler thread can drain too.
//! - Draining happens at most once; afterwards registrations are refused.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::fs_ops::delete_tree;
use crate::platform::make_fully_permissive;

/// Lifecycle of a [`TempRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Nothing registered yet.
    Empty,
    /// At least one path registered; cleanup will run at drain.
    Armed,
    /// Cleanup has run; no further registrations are accepted.
    Drained,
}

#[derive(Debug)]
struct Inner {
    state: RegistryState,
    paths: Vec<PathBuf>,
}

/// Outcome of a drain.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Paths that were present and are now gone.
    pub removed: Vec<PathBuf>,
    /// Paths that had already disappeared.
    pub missing: Vec<PathBuf>,
    /// Paths that could not be removed.
    pub failed: Vec<PathBuf>,
}

impl DrainReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Registry of temporary files and directories owned by this process.
#[derive(Debug)]
pub struct TempRegistry {
    inner: Mutex<Inner>,
}

impl Default for TempRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TempRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: RegistryState::Empty,
                paths: Vec::new(),
            }),
        }
    }

    /// Convenience constructor for the common shared case.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // A panic while holding the lock must not prevent cleanup.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Track `path` for removal at drain time.
    pub fn register(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut inner = self.lock();
        match inner.state {
            RegistryState::Drained => {
                warn!(path = %path.display(), "temp registry already drained; path will not be cleaned up");
            }
            RegistryState::Empty => {
                debug!("temp registry armed");
                inner.state = RegistryState::Armed;
                debug!(path = %path.display(), "registered temp path");
                inner.paths.push(path);
            }
            RegistryState::Armed => {
                debug!(path = %path.display(), "registered temp path");
                inner.paths.push(path);
            }
        }
    }

    /// Snapshot of the tracked paths, in registration order.
    pub fn registered(&self) -> Vec<PathBuf> {
        self.lock().paths.clone()
    }

    pub fn state(&self) -> RegistryState {
        self.lock().state
    }

    /// Remove every tracked path that still exists. Runs at most once.
    ///
    /// Individual failures are logged and recorded in the report; they never stop
    /// the remaining removals.
    pub fn drain(&self) -> DrainReport {
        let paths = {
            let mut inner = self.lock();
            if inner.state == RegistryState::Drained {
                return DrainReport::default();
            }
            inner.state = RegistryState::Drained;
            std::mem::take(&mut inner.paths)
        };

        let mut report = DrainReport::default();
        for path in paths {
            match remove_temp_path(&path) {
                Ok(true) => {
                    debug!(path = %path.display(), "removed temp path");
                    report.removed.push(path);
                }
                Ok(false) => report.missing.push(path),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove temp path");
                    report.failed.push(path);
                }
            }
        }
        if !report.is_empty() {
            info!(
                removed = report.removed.len(),
                missing = report.missing.len(),
                failed = report.failed.len(),
                "temp cleanup finished"
            );
        }
        report
    }

    /// Guard that drains this registry when dropped.
    pub fn guard(self: &Arc<Self>) -> DrainGuard {
        DrainGuard {
            registry: Arc::clone(self),
        }
    }
}

/// Returns Ok(false) when the path was already gone.
fn remove_temp_path(path: &Path) -> io::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if meta.is_dir() {
        delete_tree(path, true, false).map_err(|e| io::Error::new(e.source.kind(), e.to_string()))?;
    } else {
        if !meta.file_type().is_symlink() {
            let _ = make_fully_permissive(path);
        }
        fs::remove_file(path)?;
    }
    Ok(true)
}

/// Drains the registry on drop, covering every return path of the owner's scope.
#[derive(Debug)]
#[must_use = "the registry is drained when the guard is dropped"]
pub struct DrainGuard {
    registry: Arc<TempRegistry>,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.registry.drain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn state_transitions() {
        let td = tempdir().unwrap();
        let reg = TempRegistry::new();
        assert_eq!(reg.state(), RegistryState::Empty);

        let f = td.path().join("a.tmp");
        fs::write(&f, b"x").unwrap();
        reg.register(&f);
        assert_eq!(reg.state(), RegistryState::Armed);

        let report = reg.drain();
        assert_eq!(report.removed, vec![f.clone()]);
        assert_eq!(reg.state(), RegistryState::Drained);
        assert!(!f.exists());
    }

    #[test]
    fn register_after_drain_is_refused() {
        let td = tempdir().unwrap();
        let reg = TempRegistry::new();
        reg.drain();

        let f = td.path().join("late.tmp");
        fs::write(&f, b"x").unwrap();
        reg.register(&f);
        assert!(reg.registered().is_empty());
        assert_eq!(reg.state(), RegistryState::Drained);
        assert!(reg.drain().is_empty());
        assert!(f.exists());
    }

    #[test]
    fn guard_drains_on_drop() {
        let td = tempdir().unwrap();
        let dir = td.path().join("stage");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file"), b"x").unwrap();

        let reg = TempRegistry::shared();
        reg.register(&dir);
        {
            let _guard = reg.guard();
        }
        assert!(!dir.exists());
        assert_eq!(reg.state(), RegistryState::Drained);
    }

    #[cfg(unix)]
    #[test]
    fn readonly_file_is_removed() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let f = td.path().join("ro.tmp");
        fs::write(&f, b"x").unwrap();
        fs::set_permissions(&f, fs::Permissions::from_mode(0o400)).unwrap();

        let reg = TempRegistry::new();
        reg.register(&f);
        let report = reg.drain();
        assert_eq!(report.removed.len(), 1);
        assert!(!f.exists());
    }
}
