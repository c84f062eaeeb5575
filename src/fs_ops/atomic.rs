//! Atomic rename helper for directory moves.
//! - Performs a single rename; the caller decides how to fall back.
//! - Some platforms leave an empty regular file at the destination when a rename
//!   across filesystems fails half-way; that stray file is removed here. Files
//!   with content are left alone.
//! - On Unix, best-effort fsync of the destination directory after a successful rename.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::helpers::{describe_io_error, is_cross_device};

/// Environment switch that skips the rename so the copy+delete path runs.
pub const FORCE_DIR_COPY_ENV: &str = "DIRSYNC_FORCE_DIR_COPY";

pub(crate) fn force_copy_requested() -> bool {
    std::env::var_os(FORCE_DIR_COPY_ENV).is_some_and(|v| v == "1")
}

/// Rename `src` to `dst` in one step.
pub(crate) fn try_atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => {
            #[cfg(unix)]
            if let Some(parent) = dst.parent() {
                // Ignore fsync errors to avoid turning a successful rename into a failure.
                let _ = fs::File::open(parent).and_then(|f| f.sync_all());
            }
            Ok(())
        }
        Err(e) => {
            if is_cross_device(&e) {
                debug!(src = %src.display(), dst = %dst.display(), "rename crosses devices");
            } else {
                warn!(error = %describe_io_error("rename", src, &e), "atomic rename failed");
            }
            remove_stray_file(dst);
            Err(e)
        }
    }
}

/// Only an empty regular file counts as stray; anything with content belongs to someone.
fn remove_stray_file(dst: &Path) {
    let Ok(meta) = fs::symlink_metadata(dst) else {
        return;
    };
    if meta.is_file() && meta.len() == 0 {
        match fs::remove_file(dst) {
            Ok(()) => debug!(path = %dst.display(), "removed stray file left by failed rename"),
            Err(e) => warn!(path = %dst.display(), error = %e, "could not remove stray file left by failed rename"),
        }
    }
}
