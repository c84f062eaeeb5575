//! Config module.
//! Provides configuration types, default paths and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DIRSYNC_CONFIG";

/// Directory under the home directory used for backups when `backup_dir` is unset.
pub const BACKUP_DIR_DEFAULT_NAME: &str = "dirsync-backups";
