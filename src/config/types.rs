//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration consumed by the primitives and the CLI.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Root directory for backups (`<home>/dirsync-backups` when unset)
    pub backup_dir: Option<PathBuf>,
    /// Directory for temporary files (OS temp dir when unset)
    pub tmp_dir: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Look up an option by its config-file name.
    pub fn option(&self, name: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match name {
            "backup_dir" | "backup-dir" => path(&self.backup_dir),
            "tmp_dir" | "tmp" => path(&self.tmp_dir),
            "log_file" => path(&self.log_file),
            "log_level" => Some(self.log_level.to_string()),
            _ => None,
        }
    }

    /// Like [`Config::option`], falling back to `default` when unset or unknown.
    pub fn option_or(&self, name: &str, default: &str) -> String {
        self.option(name).unwrap_or_else(|| default.to_string())
    }
}
