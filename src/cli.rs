//! CLI definition and parsing.
//! Defines Args (global flags + subcommands) and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - CLI flags override values loaded from the XML config.

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::{Depth, KeyField, OverwritePolicy};

/// Recursive directory copy/move/delete and tree scanning.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Copy, move, delete and scan directory trees")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Append logs to this file in addition to stderr.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy a directory tree.
    Copy {
        #[arg(value_hint = ValueHint::DirPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dst: PathBuf,
        /// What to do when DST already exists.
        #[arg(long, default_value = "abort", value_parser = parse_policy)]
        policy: OverwritePolicy,
        /// Copy into a temporary staging directory first, then move into place.
        #[arg(long)]
        staged: bool,
    },
    /// Move a directory tree (rename, or copy + delete across filesystems).
    Move {
        #[arg(value_hint = ValueHint::DirPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dst: PathBuf,
        /// Replace DST if it exists.
        #[arg(long)]
        overwrite: bool,
    },
    /// Delete a file or directory tree.
    Delete {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        /// Clear read-only protection before removing entries.
        #[arg(long)]
        force: bool,
        /// Delete the target of a symlink instead of the link.
        #[arg(long)]
        follow_symlinks: bool,
    },
    /// List files under a directory, one per line.
    Scan {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Regular expression matched against file base names.
        #[arg(long, default_value = ".*")]
        mask: String,
        /// Entry names to skip (repeatable). Replaces the default of `.` and `..`.
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,
        /// Maximum subdirectory depth to descend (0 = root only).
        #[arg(long)]
        max_depth: Option<usize>,
        /// Only report files at least this many levels below DIR.
        #[arg(long, default_value_t = 0)]
        min_depth: usize,
        /// Which field keys the result (and collapses duplicates).
        #[arg(long, value_enum, default_value_t = KeyArg::FullPath)]
        key: KeyArg,
        /// Include names starting with a dot.
        #[arg(long)]
        include_dot_files: bool,
    },
    /// Print the aggregate MD5 digest of a directory tree.
    Digest {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },
    /// Create a timestamped backup directory and print its path.
    BackupDir {
        /// Refuse if the backup directory would end up inside this tree.
        #[arg(long, value_hint = ValueHint::DirPath)]
        root: Option<PathBuf>,
        /// Extra path segment below the timestamp.
        #[arg(long)]
        subdir: Option<String>,
    },
    /// Print the config file location and effective settings, then exit.
    PrintConfig,
}

/// CLI spelling of [`KeyField`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyArg {
    FullPath,
    BaseName,
    Stem,
}

impl From<KeyArg> for KeyField {
    fn from(k: KeyArg) -> Self {
        match k {
            KeyArg::FullPath => KeyField::FullPath,
            KeyArg::BaseName => KeyField::BaseName,
            KeyArg::Stem => KeyField::Stem,
        }
    }
}

fn parse_policy(s: &str) -> Result<OverwritePolicy, String> {
    s.parse()
}

/// Depth bound for a `--max-depth` value.
pub fn depth_from(max_depth: Option<usize>) -> Depth {
    max_depth.map_or(Depth::Unbounded, Depth::Limited)
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
