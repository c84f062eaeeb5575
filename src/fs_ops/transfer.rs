//! Recursive copy and delete of file/directory subtrees.
//!
//! Both walks stop at the first failure and report it as a `TransferError`
//! naming the failing path; nothing is rolled back, so a failed call can leave
//! a partially copied destination or a partially emptied directory behind.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

use super::metadata;
use super::mkdir::ensure_dir;
use crate::errors::TransferError;
use crate::platform::{create_symlink, make_fully_permissive};

/// Recursively copy `src` to `dst`.
///
/// - Symlinks are recreated with the same target string, never followed.
/// - Directories are created (with missing parents) and merged into when present;
///   a symlink at a directory's destination is removed first, so nothing is
///   written through it.
/// - Regular files are byte-copied, overwriting an existing destination file.
/// - Each copied entry gets the source mtime; execute bits are added on Unix.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), TransferError> {
    let meta = fs::symlink_metadata(src).map_err(TransferError::at("read metadata", src))?;
    let file_type = meta.file_type();

    if file_type.is_symlink() {
        let target = fs::read_link(src).map_err(TransferError::at("read symlink", src))?;
        remove_non_dir(dst)?;
        let target_is_dir = fs::metadata(src).map(|m| m.is_dir()).unwrap_or(false);
        create_symlink(&target, dst, target_is_dir)
            .map_err(TransferError::at("create symlink", dst))?;
        trace!(src = %src.display(), dst = %dst.display(), target = %target.display(), "recreated symlink");
    } else if file_type.is_dir() {
        // A linked directory at the destination is replaced, not merged into.
        if is_symlink(dst) {
            remove_symlink(dst).map_err(TransferError::at("remove symlink", dst))?;
            trace!(dst = %dst.display(), "replaced directory symlink with a real directory");
        }
        ensure_dir(dst).map_err(|e| TransferError::from_mkdir(e, dst))?;
        let entries = fs::read_dir(src).map_err(TransferError::at("read directory", src))?;
        for entry in entries {
            let entry = entry.map_err(TransferError::at("read directory", src))?;
            let name = entry.file_name();
            copy_tree(&src.join(&name), &dst.join(&name))?;
        }
    } else {
        // Never write through a symlink sitting at the destination.
        if is_symlink(dst) {
            remove_symlink(dst).map_err(TransferError::at("remove symlink", dst))?;
        }
        fs::copy(src, dst).map_err(TransferError::at("copy file", src))?;
        trace!(src = %src.display(), dst = %dst.display(), "copied file");
    }

    if let Err(e) = metadata::carry_over(dst, &meta) {
        warn!(path = %dst.display(), error = %e, "failed to carry over mtime/permissions");
    }
    Ok(())
}

/// Delete `path` and everything beneath it.
///
/// - A missing path is a success.
/// - A symlink is unlinked; with `follow_symlinks` its resolved target is deleted
///   instead and the link itself is left in place (a dangling link is a no-op).
/// - With `force`, read-only protection is stripped before each removal.
/// - Directories are emptied entry by entry, then removed.
pub fn delete_tree(path: &Path, force: bool, follow_symlinks: bool) -> Result<(), TransferError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(TransferError::new("read metadata", path, e)),
    };

    if meta.file_type().is_symlink() {
        if !follow_symlinks {
            remove_symlink(path).map_err(TransferError::at("remove symlink", path))?;
            trace!(path = %path.display(), "unlinked symlink");
            return Ok(());
        }
        let target = match fs::canonicalize(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "symlink target missing; nothing to delete");
                return Ok(());
            }
            Err(e) => return Err(TransferError::new("resolve symlink", path, e)),
        };
        return delete_tree(&target, force, false);
    }

    if !meta.is_dir() {
        if force {
            let _ = make_fully_permissive(path);
        }
        fs::remove_file(path).map_err(TransferError::at("remove file", path))?;
        trace!(path = %path.display(), "removed file");
        return Ok(());
    }

    delete_dir_contents(path, force)?;
    fs::remove_dir(path).map_err(TransferError::at("remove directory", path))?;
    trace!(path = %path.display(), "removed directory");
    Ok(())
}

/// Delete every entry inside `dir`, leaving `dir` itself in place.
/// Stops at the first entry that cannot be deleted.
pub fn delete_dir_contents(dir: &Path, force: bool) -> Result<(), TransferError> {
    if force {
        let _ = make_fully_permissive(dir);
    }
    let entries = fs::read_dir(dir).map_err(TransferError::at("read directory", dir))?;
    for entry in entries {
        let entry = entry.map_err(TransferError::at("read directory", dir))?;
        delete_tree(&entry.path(), force, false)?;
    }
    Ok(())
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Clear a file or symlink occupying `path` so a new symlink can take its place.
fn remove_non_dir(path: &Path) -> Result<(), TransferError> {
    match fs::symlink_metadata(path) {
        Ok(m) if m.file_type().is_symlink() => {
            remove_symlink(path).map_err(TransferError::at("remove symlink", path))
        }
        Ok(m) if !m.is_dir() => fs::remove_file(path).map_err(TransferError::at("remove file", path)),
        _ => Ok(()),
    }
}

fn remove_symlink(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        // Directory symlinks on Windows are removed like directories.
        #[cfg(windows)]
        Err(_) => fs::remove_dir(path),
        #[cfg(not(windows))]
        Err(e) => Err(e),
    }
}
