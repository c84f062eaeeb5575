//! Windows implementations of platform helpers (best-effort, no ACL awareness).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; "writable" means "not READONLY".
//! - Execute bits do not exist, so merging them is a no-op.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// True when the path exists and can be opened (files) or listed (directories).
pub fn is_readable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => fs::read_dir(path).is_ok(),
        Ok(_) => File::open(path).is_ok(),
        Err(_) => false,
    }
}

/// True when the path exists and does not carry the READONLY attribute.
pub fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Clear the READONLY attribute, used before force-deleting entries.
pub fn make_fully_permissive(path: &Path) -> io::Result<()> {
    let mut perms = fs::symlink_metadata(path)?.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}

/// No-op on Windows; there are no execute bits to carry over.
pub fn merge_exec_bits(_src_meta: &fs::Metadata, _dst: &Path) -> io::Result<()> {
    Ok(())
}

/// Create `link` pointing at `target`; Windows distinguishes file and directory links.
pub fn create_symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
