//! Aggregate content hash over a directory tree.

use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::scan::{KeyField, ScanOptions, scan_directory};
use crate::errors::{DirSyncError, Result};

/// MD5 over every non-hidden file below `dir` (`.git` excluded).
///
/// Files are hashed individually in full-path order and the hex digests are
/// concatenated and hashed again, so the result changes when any file's
/// content, or the set of files, changes. Timestamps and modes are ignored.
pub fn dir_md5(dir: &Path) -> Result<String> {
    let opts = ScanOptions::new(Regex::new(".*").expect("static regex"))
        .exclude([".", "..", ".git"])
        .key(KeyField::FullPath);
    let mut files = scan_directory(dir, &opts);
    files.sort_keys();

    let mut digests = String::with_capacity(files.len() * 32);
    for entry in files.values() {
        // Sockets, fifos and device nodes have no content to hash and may block on read.
        if !fs::metadata(&entry.full_path).is_ok_and(|m| m.is_file()) {
            debug!(path = %entry.full_path.display(), "skipping non-regular file in digest");
            continue;
        }
        let bytes = fs::read(&entry.full_path)
            .map_err(DirSyncError::io("read file for digest", &entry.full_path))?;
        digests.push_str(&format!("{:x}", md5::compute(bytes)));
    }
    Ok(format!("{:x}", md5::compute(digests.as_bytes())))
}
