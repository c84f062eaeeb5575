//! Unix implementations of platform helpers.

use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

fn access(path: &Path, mode: libc::c_int) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

/// True when the path exists and the real user may read it.
pub fn is_readable(path: &Path) -> bool {
    access(path, libc::R_OK)
}

/// True when the path exists and the real user may write to it.
pub fn is_writable(path: &Path) -> bool {
    access(path, libc::W_OK)
}

/// chmod 0777, used before force-deleting read-only entries.
pub fn make_fully_permissive(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o777))
}

/// OR the execute bits of `src_meta` into `dst`'s mode. Never removes bits.
pub fn merge_exec_bits(src_meta: &fs::Metadata, dst: &Path) -> io::Result<()> {
    let exec = src_meta.permissions().mode() & 0o111;
    if exec == 0 {
        return Ok(());
    }
    let current = fs::metadata(dst)?.permissions().mode();
    if current & exec == exec {
        return Ok(());
    }
    fs::set_permissions(dst, fs::Permissions::from_mode(current | exec))
}

/// Create `link` pointing at `target`. The target kind is irrelevant on Unix.
pub fn create_symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn running_as_root() -> bool {
        unsafe { libc::geteuid() == 0 }
    }

    #[test]
    fn exec_bits_are_added_not_replaced() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("tool.sh");
        let dst = dir.path().join("copy.sh");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::write(&dst, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o710)).unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o644)).unwrap();

        let meta = fs::metadata(&src).unwrap();
        merge_exec_bits(&meta, &dst).unwrap();

        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o754);
    }

    #[test]
    fn no_exec_bits_leaves_mode_alone() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dst = dir.path().join("b.txt");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"b").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o600)).unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o640)).unwrap();

        merge_exec_bits(&fs::metadata(&src).unwrap(), &dst).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn writable_check_follows_mode() {
        if running_as_root() {
            eprintln!("skipping: running as root");
            return;
        }
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        assert!(is_writable(&locked));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
        assert!(!is_writable(&locked));
        assert!(is_readable(&locked));
        make_fully_permissive(&locked).unwrap();
        assert!(is_writable(&locked));
    }

    #[test]
    fn missing_path_is_neither_readable_nor_writable() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(!is_readable(&missing));
        assert!(!is_writable(&missing));
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("new_log.txt");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }
}
