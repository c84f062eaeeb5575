//! Creation of uniquely named temp files and directories.
//! Everything created here is handed to a [`TempRegistry`] for removal at shutdown.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::debug;

use super::registry::TempRegistry;
use crate::config::Config;
use crate::errors::{DirSyncError, Result};

const DEFAULT_PREFIX: &str = "dirsync-";

/// Directory for temporary files: the configured `tmp_dir`, else the OS temp dir.
pub fn find_tmp(config: &Config) -> PathBuf {
    config
        .tmp_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir)
}

fn builder<'a>(prefix: &'a str, suffix: &'a str) -> Builder<'a, 'a> {
    let mut b = Builder::new();
    b.prefix(if prefix.is_empty() { DEFAULT_PREFIX } else { prefix })
        .suffix(suffix);
    b
}

/// Create an empty, uniquely named file in `tmp_dir` and register it.
pub fn temp_file(
    registry: &TempRegistry,
    tmp_dir: &Path,
    prefix: &str,
    suffix: &str,
) -> Result<PathBuf> {
    save_with_prefix(registry, tmp_dir, prefix, suffix, &[])
}

/// Create a uniquely named file in `tmp_dir` holding `data` and register it.
pub fn save_data_to_temp_file(
    registry: &TempRegistry,
    tmp_dir: &Path,
    data: &[u8],
    suffix: &str,
) -> Result<PathBuf> {
    save_with_prefix(registry, tmp_dir, DEFAULT_PREFIX, suffix, data)
}

fn save_with_prefix(
    registry: &TempRegistry,
    tmp_dir: &Path,
    prefix: &str,
    suffix: &str,
    data: &[u8],
) -> Result<PathBuf> {
    let named = builder(prefix, suffix)
        .tempfile_in(tmp_dir)
        .map_err(DirSyncError::io("create temp file", tmp_dir))?;
    let (mut file, path) = named
        .keep()
        .map_err(|e| DirSyncError::Io {
            op: "keep temp file",
            path: tmp_dir.to_path_buf(),
            source: e.error,
        })?;
    // Register before writing so a failed write still gets cleaned up.
    registry.register(&path);
    if !data.is_empty() {
        file.write_all(data)
            .and_then(|()| file.flush())
            .map_err(DirSyncError::io("write temp file", &path))?;
    }
    debug!(path = %path.display(), bytes = data.len(), "created temp file");
    Ok(path)
}

/// Create a uniquely named directory in `tmp_dir` and register it.
pub fn temp_dir(registry: &TempRegistry, tmp_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let dir = builder(prefix, "")
        .tempdir_in(tmp_dir)
        .map_err(DirSyncError::io("create temp directory", tmp_dir))?;
    let path = dir.keep();
    registry.register(&path);
    debug!(path = %path.display(), "created temp directory");
    Ok(path)
}
