//! Core library for `dirsync`.
//!
//! Filesystem primitives for command-line tools: recursive directory copy, move
//! and delete under an overwrite policy, filtered tree scanning, and a registry
//! that removes temporary files when the process ends.
//!
//! Module map:
//! - `fs_ops`: scanning, recursive transfer, copy/move orchestration, digests, backups
//! - `temp`: temp-file creation and the cleanup registry
//! - `config`: XML configuration and option lookup
//! - `errors`: typed failures with stable codes
//! - `platform`: OS-specific permission and symlink helpers
//! - `utils`: path predicates shared across modules

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod temp;
pub mod utils;

pub use config::{Config, LogLevel, config_path, default_log_path, path_has_symlink_ancestor};
pub use errors::{DirSyncError, TransferError};
pub use fs_ops::{
    Depth, DirEntry, FORCE_DIR_COPY_ENV, KeyField, OverwritePolicy, ScanOptions, copy_dir,
    copy_tree, delete_dir_contents, delete_tree, dir_md5, ensure_dir, move_dir,
    prepare_backup_dir, scan_directory,
};
pub use temp::{
    DrainGuard, DrainReport, RegistryState, TempRegistry, find_tmp, save_data_to_temp_file,
    temp_dir, temp_file,
};
pub use utils::{is_absolute_path, is_nested_directory, normalize_path};
