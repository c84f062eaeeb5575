//! Metadata carried over by the recursive copy.
//! - Modification time is copied from source to destination (symlinks are not followed).
//! - On Unix, execute bits of the source are OR-ed into the destination mode.
//! - Permissions are only ever added, never removed.

use filetime::{FileTime, set_file_mtime, set_symlink_file_times};
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use crate::platform::merge_exec_bits;

/// Apply `src_meta` (from `symlink_metadata`) to the freshly copied `dest`.
pub(crate) fn carry_over(dest: &Path, src_meta: &fs::Metadata) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(src_meta);

    if src_meta.file_type().is_symlink() {
        let atime = FileTime::from_last_access_time(src_meta);
        set_symlink_file_times(dest, atime, mtime)?;
        trace!(path = %dest.display(), "set symlink mtime");
        return Ok(());
    }

    set_file_mtime(dest, mtime)?;
    merge_exec_bits(src_meta, dest)?;
    trace!(path = %dest.display(), "set mtime and execute bits on destination");
    Ok(())
}
