//! Path predicates and transforms shared by the sync primitives.

use std::path::{Path, PathBuf};

/// True for `/x`, `\x` and drive-qualified `C:\x` / `C:/x` forms, on every platform.
pub fn is_absolute_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [b'/' | b'\\', ..] => true,
        [drive, b':', b'/' | b'\\', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// Use forward slashes throughout and drop a trailing separator (roots are kept).
pub fn normalize_path(path: &str) -> String {
    let mut out = path.replace('\\', "/");
    while out.len() > 1 && out.ends_with('/') && !is_drive_root(&out) {
        out.pop();
    }
    out
}

fn is_drive_root(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && b[2] == b'/'
}

/// True when `child` is `parent` or lies somewhere beneath it.
///
/// Both paths are resolved through symlinks as far as they exist, so a
/// not-yet-created child under a symlinked parent is still detected.
pub fn is_nested_directory(parent: &Path, child: &Path) -> bool {
    let parent = resolve_lenient(parent);
    let child = resolve_lenient(child);
    child.starts_with(&parent)
}

/// Canonicalize the longest existing ancestor of `path` and re-append the rest.
fn resolve_lenient(path: &Path) -> PathBuf {
    if let Ok(real) = dunce::canonicalize(path) {
        return real;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            resolve_lenient(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}
