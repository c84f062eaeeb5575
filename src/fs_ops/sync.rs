//! Directory copy/move orchestration.
//! Applies the overwrite policy, validates source and destination, then hands the
//! actual work to the recursive transfer (or a single rename for moves).

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::atomic::{force_copy_requested, try_atomic_rename};
use super::transfer::{copy_tree, delete_tree};
use crate::errors::{DirSyncError, Result, TransferError};
use crate::platform::{is_readable, is_writable};
use crate::utils::is_nested_directory;

/// What to do when the destination of a copy already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Fail with `DestinationExists` and leave the destination alone.
    #[default]
    Abort,
    /// Delete the destination tree first, then copy.
    Overwrite,
    /// Copy into the existing tree; colliding files are replaced, others kept.
    Merge,
}

impl OverwritePolicy {
    /// Parse common names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" | "fail" => Some(OverwritePolicy::Abort),
            "overwrite" | "replace" => Some(OverwritePolicy::Overwrite),
            "merge" => Some(OverwritePolicy::Merge),
            _ => None,
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverwritePolicy::Abort => "abort",
            OverwritePolicy::Overwrite => "overwrite",
            OverwritePolicy::Merge => "merge",
        };
        f.write_str(s)
    }
}

impl FromStr for OverwritePolicy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid overwrite policy: '{s}'"))
    }
}

/// Copy the directory `src` to `dst` under `policy`.
pub fn copy_dir(src: &Path, dst: &Path, policy: OverwritePolicy) -> Result<()> {
    refuse_nested(src, dst)?;

    if path_exists(dst) {
        match policy {
            OverwritePolicy::Abort => {
                return Err(DirSyncError::DestinationExists(dst.to_path_buf()));
            }
            OverwritePolicy::Overwrite => remove_existing(dst),
            OverwritePolicy::Merge => {
                info!(dest = %dst.display(), "Merging into existing directory");
            }
        }
    }

    check_preconditions(src, dst)?;

    copy_tree(src, dst).map_err(|source| DirSyncError::CopyFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;
    info!(src = %src.display(), dest = %dst.display(), %policy, "Copied directory");
    Ok(())
}

/// Move the directory `src` to `dst`.
///
/// Tries a single rename first; when that fails (typically across filesystems)
/// falls back to an overwriting copy followed by a forced delete of `src`.
pub fn move_dir(src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
    let move_failed = |source: DirSyncError| DirSyncError::MoveFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source: Box::new(source),
    };

    refuse_nested(src, dst).map_err(move_failed)?;

    if path_exists(dst) {
        if !overwrite {
            return Err(DirSyncError::DestinationExists(dst.to_path_buf()));
        }
        remove_existing(dst);
    }

    check_preconditions(src, dst)?;

    if force_copy_requested() {
        debug!(src = %src.display(), "rename skipped; copy fallback forced");
    } else if try_atomic_rename(src, dst).is_ok() {
        info!(src = %src.display(), dest = %dst.display(), "Renamed directory atomically");
        return Ok(());
    }

    copy_dir(src, dst, OverwritePolicy::Overwrite).map_err(move_failed)?;
    delete_tree(src, true, false).map_err(|e| {
        move_failed(DirSyncError::Io {
            op: e.op,
            path: e.path,
            source: e.source,
        })
    })?;
    info!(src = %src.display(), dest = %dst.display(), "Copied directory and removed source");
    Ok(())
}

/// A destination at or below the source would have the copy read its own output.
/// Checked before anything under `dst` is touched.
fn refuse_nested(src: &Path, dst: &Path) -> Result<()> {
    if !is_nested_directory(src, dst) {
        return Ok(());
    }
    Err(DirSyncError::CopyFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source: TransferError::new(
            "copy into own subdirectory",
            dst,
            io::Error::new(io::ErrorKind::InvalidInput, "destination is inside the source tree"),
        ),
    })
}

fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Best-effort removal of a destination about to be replaced.
fn remove_existing(dst: &Path) {
    if let Err(e) = delete_tree(dst, true, false) {
        warn!(dest = %dst.display(), error = %e, "could not fully remove existing destination; continuing");
    }
}

fn check_preconditions(src: &Path, dst: &Path) -> Result<()> {
    if !is_readable(src) {
        return Err(DirSyncError::SourceUnreadable(src.to_path_buf()));
    }
    let parent = dst
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !is_writable(parent) {
        return Err(DirSyncError::DestinationNotWritable(parent.to_path_buf()));
    }
    Ok(())
}
