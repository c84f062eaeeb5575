//! Typed error definitions for dirsync.
//! Provides the well-known failure modes of the sync primitives for better logs and tests.
//!
//! Notes:
//! - Precondition failures (existence, readability, writability) get their own variants.
//! - Failures deep inside a recursive copy collapse to `CopyFailed` / `MoveFailed`,
//!   but keep the first failing path and the io error as the error source.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::helpers::describe_io_error;

/// Convenience alias for results of the sync primitives.
pub type Result<T, E = DirSyncError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DirSyncError {
    #[error("Destination {0} already exists")]
    DestinationExists(PathBuf),

    #[error("Source {0} is not readable or does not exist")]
    SourceUnreadable(PathBuf),

    #[error("Destination {0} is not writable; check directory permissions")]
    DestinationNotWritable(PathBuf),

    #[error("Unable to create {path}")]
    CreateDirFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to create {path} in {parent}; check directory permissions")]
    ParentNotWritable { path: PathBuf, parent: PathBuf },

    #[error("Unable to copy {src} to {dst}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: TransferError,
    },

    #[error("Unable to move {src} to {dst}")]
    MoveFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: Box<DirSyncError>,
    },

    #[error("Backup directory {backup} is inside the protected root {root}")]
    BackupPathInsideRoot { backup: PathBuf, root: PathBuf },

    #[error("{}", describe_io_error(.op, .path, .source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DirSyncError {
    /// Stable numeric code for structured logs and exit statuses.
    pub fn code(&self) -> i32 {
        match self {
            DirSyncError::DestinationExists(_) => 10,
            DirSyncError::SourceUnreadable(_) => 11,
            DirSyncError::DestinationNotWritable(_) => 12,
            DirSyncError::CreateDirFailure { .. } => 13,
            DirSyncError::ParentNotWritable { .. } => 14,
            DirSyncError::CopyFailed { .. } => 20,
            DirSyncError::MoveFailed { .. } => 21,
            DirSyncError::BackupPathInsideRoot { .. } => 30,
            DirSyncError::Io { .. } => 40,
        }
    }

    /// Short machine-friendly kind name, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DirSyncError::DestinationExists(_) => "destination_exists",
            DirSyncError::SourceUnreadable(_) => "source_unreadable",
            DirSyncError::DestinationNotWritable(_) => "destination_not_writable",
            DirSyncError::CreateDirFailure { .. } => "create_dir_failure",
            DirSyncError::ParentNotWritable { .. } => "parent_not_writable",
            DirSyncError::CopyFailed { .. } => "copy_failed",
            DirSyncError::MoveFailed { .. } => "move_failed",
            DirSyncError::BackupPathInsideRoot { .. } => "backup_path_inside_root",
            DirSyncError::Io { .. } => "io",
        }
    }

    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| DirSyncError::Io { op, path, source }
    }
}

/// First failure hit while walking a tree during copy or delete.
#[derive(Debug, Error)]
#[error("{}", describe_io_error(.op, .path, .source))]
pub struct TransferError {
    /// What was being attempted ("copy file", "remove directory", ...).
    pub op: &'static str,
    /// The path the operation failed on.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl TransferError {
    pub(crate) fn new(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }

    /// Adapter for `.map_err(...)` on io results.
    pub(crate) fn at<'a>(op: &'static str, path: &'a std::path::Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::new(op, path, source)
    }

    /// Lift a precondition error from directory creation into the transfer error shape.
    pub(crate) fn from_mkdir(err: DirSyncError, path: &std::path::Path) -> Self {
        let source = match err {
            DirSyncError::CreateDirFailure { source, .. } => source,
            other => io::Error::new(io::ErrorKind::PermissionDenied, other.to_string()),
        };
        Self::new("create directory", path, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn codes_are_distinct() {
        let p = PathBuf::from("/x");
        let errs = [
            DirSyncError::DestinationExists(p.clone()),
            DirSyncError::SourceUnreadable(p.clone()),
            DirSyncError::DestinationNotWritable(p.clone()),
            DirSyncError::ParentNotWritable {
                path: p.clone(),
                parent: p.clone(),
            },
            DirSyncError::BackupPathInsideRoot {
                backup: p.clone(),
                root: p.clone(),
            },
        ];
        let mut codes: Vec<i32> = errs.iter().map(DirSyncError::code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn copy_failed_keeps_failing_path_as_source() {
        let inner = TransferError::new(
            "copy file",
            "/src/a/deep/file.txt",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let err = DirSyncError::CopyFailed {
            src: "/src/a".into(),
            dst: "/dst/a".into(),
            source: inner,
        };
        assert!(err.to_string().contains("/src/a"));
        let src = err.source().expect("source");
        assert!(src.to_string().contains("deep/file.txt"));
    }
}
