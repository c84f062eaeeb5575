//! I/O error description helpers.
//!
//! Turns an io::Error into a human-friendly message with the operation, the
//! offending path and a platform-aware hint. Used by the Display impls of
//! `TransferError` and `DirSyncError::Io`, so every reported failure names its path.

use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str(" - permission denied; check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str(" - cross-filesystem; atomic rename not possible.");
                }
                libc::EBUSY => {
                    msg.push_str(" - resource busy; ensure no other process is using it.");
                }
                libc::ENOENT => {
                    msg.push_str(" - path not found; verify it exists.");
                }
                libc::EEXIST => {
                    msg.push_str(" - already exists; remove the target or choose another policy.");
                }
                libc::ENOTEMPTY => {
                    msg.push_str(" - directory not empty; something was added while deleting.");
                }
                libc::ENOSPC => {
                    msg.push_str(" - insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str(" - read-only filesystem; cannot write here.");
                }
                libc::ELOOP => {
                    msg.push_str(" - too many symbolic link levels; possible symlink cycle.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str(" - filename or path too long; shorten path segments.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str(" - access denied; check permissions."),
                17 => msg.push_str(" - not same device; cross-filesystem move."),
                32 => msg.push_str(" - sharing violation; file is in use."),
                2 | 3 => msg.push_str(" - path not found; verify it exists."),
                80 | 183 => msg.push_str(" - already exists; remove the target or choose another policy."),
                112 => msg.push_str(" - insufficient disk space."),
                145 => msg.push_str(" - directory not empty."),
                206 => msg.push_str(" - filename or path too long (MAX_PATH exceeded)."),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str(" - permission denied; check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str(" - path not found; verify it exists.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str(" - already exists; remove the target or choose another policy.");
            }
            _ => {}
        }
    }

    msg
}

/// True when a rename failed only because source and destination live on different devices.
pub(crate) fn is_cross_device(e: &io::Error) -> bool {
    // io::ErrorKind::CrossesDevices is not stable on every toolchain we target,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}
