//! Timestamped backup directories.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use super::mkdir::ensure_dir;
use crate::config::{BACKUP_DIR_DEFAULT_NAME, Config};
use crate::errors::{DirSyncError, Result};
use crate::utils::is_nested_directory;

/// Compute, check and create `<backup_dir>/<timestamp>[/<subdir>]`.
///
/// `backup_dir` is the configured option, else `~/dirsync-backups`. When `root`
/// is given, a backup path nested inside it is refused with `BackupPathInsideRoot`
/// so a tree is never backed up into itself.
pub fn prepare_backup_dir(config: &Config, root: Option<&Path>, subdir: Option<&str>) -> Result<PathBuf> {
    let base = backup_base(config);
    let mut backup = base.join(Local::now().format("%Y%m%d%H%M%S").to_string());
    if let Some(sub) = subdir.filter(|s| !s.is_empty()) {
        backup.push(sub);
    }

    if let Some(root) = root
        && is_nested_directory(root, &backup)
    {
        return Err(DirSyncError::BackupPathInsideRoot {
            backup,
            root: root.to_path_buf(),
        });
    }

    ensure_dir(&backup)?;
    info!(path = %backup.display(), "prepared backup directory");
    Ok(backup)
}

fn backup_base(config: &Config) -> PathBuf {
    if let Some(dir) = &config.backup_dir {
        return dir.clone();
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(BACKUP_DIR_DEFAULT_NAME)
}
