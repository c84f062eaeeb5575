//! Filesystem operations: modularized.

mod atomic;
mod backup;
mod digest;
pub(crate) mod helpers;
mod metadata;
mod mkdir;
mod scan;
mod sync;
mod transfer;

pub use atomic::FORCE_DIR_COPY_ENV;
pub use backup::prepare_backup_dir;
pub use digest::dir_md5;
pub use mkdir::ensure_dir;
pub use scan::{Depth, DirEntry, KeyField, ScanOptions, scan_directory};
pub use sync::{OverwritePolicy, copy_dir, move_dir};
pub use transfer::{copy_tree, delete_dir_contents, delete_tree};
