#![cfg(unix)]

use dirsync::{DirSyncError, OverwritePolicy, copy_dir, delete_tree, ensure_dir};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::tempdir;

fn running_as_root() -> bool {
    // Root bypasses permission checks, so these scenarios cannot be reproduced.
    unsafe { libc::geteuid() == 0 }
}

fn set_mode(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn copy_into_readonly_parent_is_not_writable() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();
    let locked = td.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    set_mode(&locked, 0o555);

    let err = copy_dir(&src, &locked.join("dst"), OverwritePolicy::Abort).unwrap_err();
    set_mode(&locked, 0o755);

    match err {
        DirSyncError::DestinationNotWritable(p) => assert_eq!(p, locked),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreadable_source_is_reported() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    set_mode(&src, 0o000);

    let err = copy_dir(&src, &td.path().join("dst"), OverwritePolicy::Abort).unwrap_err();
    set_mode(&src, 0o755);

    assert!(matches!(err, DirSyncError::SourceUnreadable(_)), "{err:?}");
}

#[test]
fn failure_deep_in_tree_names_the_failing_path() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(src.join("ok")).unwrap();
    fs::write(src.join("ok/fine.txt"), "fine").unwrap();
    let secret = src.join("ok/secret.txt");
    fs::write(&secret, "secret").unwrap();
    set_mode(&secret, 0o000);

    let err = copy_dir(&src, &td.path().join("dst"), OverwritePolicy::Abort).unwrap_err();
    set_mode(&secret, 0o644);

    match err {
        DirSyncError::CopyFailed { source, .. } => assert_eq!(source.path, secret),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn force_delete_clears_readonly_protection() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let root = td.path().join("tree");
    fs::create_dir_all(root.join("ro")).unwrap();
    fs::write(root.join("ro/file.txt"), "x").unwrap();
    set_mode(&root.join("ro"), 0o555);

    assert!(delete_tree(&root, false, false).is_err());
    delete_tree(&root, true, false).unwrap();
    assert!(!root.exists());
}

#[test]
fn ensure_dir_under_readonly_parent() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let parent = td.path().join("ro");
    fs::create_dir_all(&parent).unwrap();
    set_mode(&parent, 0o555);

    let err = ensure_dir(&parent.join("child")).unwrap_err();
    set_mode(&parent, 0o755);

    assert!(matches!(err, DirSyncError::ParentNotWritable { .. }), "{err:?}");
    assert_eq!(err.code(), 14);
}

#[test]
fn overwrite_continues_past_failed_removal_of_destination() {
    if running_as_root() {
        eprintln!("skipping: running as root");
        return;
    }
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();

    // The destination's contents can be removed, but not the directory itself.
    let parent = td.path().join("locked");
    let dst = parent.join("dst");
    fs::create_dir_all(dst.join("old")).unwrap();
    fs::write(dst.join("old/stale.txt"), "stale").unwrap();
    set_mode(&parent, 0o555);

    let res = copy_dir(&src, &dst, OverwritePolicy::Overwrite);
    let emptied = fs::read_dir(&dst).map(|mut it| it.next().is_none());
    set_mode(&parent, 0o755);

    // The removal failure is only logged; the precondition check reports the real problem.
    match res.unwrap_err() {
        DirSyncError::DestinationNotWritable(p) => assert_eq!(p, parent),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dst.is_dir());
    assert!(emptied.unwrap(), "destination contents should have been removed");
    assert!(!dst.join("a.txt").exists());
}
