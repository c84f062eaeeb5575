//! Filtered directory tree scanning.
//!
//! Walks a tree depth-first and returns the matching files in an ordered map
//! keyed by full path, base name or stem. Directories are traversed, never returned.
//! Symlinks are never traversed: a link to a regular file is reported like a file,
//! links to directories and dangling links are skipped.
//!
//! Ordering and tie-break: entries of a directory are visited in byte-wise name
//! order, and a subdirectory's results are merged in *before* the files already
//! collected at the current level. When two files share a key the shallower one
//! wins, and the key keeps the position it was first inserted at.

use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file found by [`scan_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Scan root joined with the relative path to the file.
    pub full_path: PathBuf,
    /// Final path segment.
    pub base_name: String,
    /// Base name without its trailing extension.
    pub stem: String,
}

impl DirEntry {
    fn new(full_path: PathBuf, base_name: String) -> Self {
        let stem = match base_name.rfind('.') {
            Some(idx) => base_name[..idx].to_string(),
            None => base_name.clone(),
        };
        Self {
            full_path,
            base_name,
            stem,
        }
    }

    fn key(&self, field: KeyField) -> String {
        match field {
            KeyField::FullPath => self.full_path.to_string_lossy().into_owned(),
            KeyField::BaseName => self.base_name.clone(),
            KeyField::Stem => self.stem.clone(),
        }
    }
}

/// Which attribute of a [`DirEntry`] keys the result map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyField {
    #[default]
    FullPath,
    BaseName,
    Stem,
}

/// How far below the root the scan recurses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    #[default]
    Unbounded,
    /// Recurse into at most this many levels of subdirectories; 0 scans the root only.
    Limited(usize),
}

impl Depth {
    fn allows_descent_from(self, depth: usize) -> bool {
        match self {
            Depth::Unbounded => true,
            Depth::Limited(n) => depth < n,
        }
    }
}

/// Filters and keying for [`scan_directory`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub mask: Regex,
    pub exclude: Vec<String>,
    pub depth: Depth,
    pub key: KeyField,
    pub min_depth: usize,
    pub include_dot_files: bool,
}

impl ScanOptions {
    /// Options matching base names against `mask`, with all other settings at their defaults.
    pub fn new(mask: Regex) -> Self {
        Self {
            mask,
            exclude: vec![".".to_string(), "..".to_string()],
            depth: Depth::Unbounded,
            key: KeyField::FullPath,
            min_depth: 0,
            include_dot_files: false,
        }
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    pub fn key(mut self, key: KeyField) -> Self {
        self.key = key;
        self
    }

    pub fn min_depth(mut self, min_depth: usize) -> Self {
        self.min_depth = min_depth;
        self
    }

    pub fn include_dot_files(mut self, include: bool) -> Self {
        self.include_dot_files = include;
        self
    }

    fn skips(&self, name: &str) -> bool {
        if self.exclude.iter().any(|n| n == name) {
            return true;
        }
        !self.include_dot_files && name.starts_with('.')
    }
}

/// Scan `dir` and return matching files keyed by `opts.key`.
///
/// Best-effort: a directory that cannot be read contributes nothing.
pub fn scan_directory(dir: &Path, opts: &ScanOptions) -> IndexMap<String, DirEntry> {
    scan_level(dir, opts, 0)
}

fn scan_level(dir: &Path, opts: &ScanOptions, depth: usize) -> IndexMap<String, DirEntry> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return IndexMap::new();
        }
    };
    let mut entries: Vec<_> = read.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    let mut subdirs = Vec::new();
    let mut level_files = Vec::new();

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if opts.skips(&name) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = dir.join(&name);

        if file_type.is_symlink() {
            // Links are never traversed. Only a link resolving to a regular file is reported.
            if !fs::metadata(&path).is_ok_and(|m| m.is_file()) {
                debug!(path = %path.display(), "skipping symlink that is not a file");
                continue;
            }
        } else if file_type.is_dir() {
            if opts.depth.allows_descent_from(depth) {
                subdirs.push(scan_level(&path, opts, depth + 1));
            }
            continue;
        }

        if depth >= opts.min_depth && opts.mask.is_match(&name) {
            let found = DirEntry::new(path, name);
            level_files.push((found.key(opts.key), found));
        }
    }

    // Later subdirectories land in front of earlier ones, and this level's files
    // go last. extend() keeps a key's first position and takes the newer value,
    // so an earlier subdirectory beats a later one and this level beats both.
    let total = subdirs.iter().map(IndexMap::len).sum::<usize>() + level_files.len();
    let mut files = IndexMap::with_capacity(total);
    for found in subdirs.into_iter().rev() {
        files.extend(found);
    }
    files.extend(level_files);
    files
}
