#![cfg(unix)]

use dirsync::{OverwritePolicy, copy_dir, copy_tree};
use filetime::FileTime;
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use tempfile::tempdir;

#[test]
fn symlinks_are_copied_as_links_with_same_target() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(src.join("data")).unwrap();
    fs::write(src.join("data/file.txt"), "x").unwrap();
    symlink("data/file.txt", src.join("relative_link")).unwrap();
    symlink("data", src.join("dir_link")).unwrap();
    symlink("/definitely/not/here", src.join("dangling")).unwrap();

    let dst = td.path().join("dst");
    copy_dir(&src, &dst, OverwritePolicy::Abort).unwrap();

    for (name, target) in [
        ("relative_link", "data/file.txt"),
        ("dir_link", "data"),
        ("dangling", "/definitely/not/here"),
    ] {
        let link = dst.join(name);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink(), "{name} should stay a link");
        assert_eq!(fs::read_link(&link).unwrap(), std::path::PathBuf::from(target));
    }
    // dir_link was not descended into; its content only exists once.
    assert_eq!(fs::read_to_string(dst.join("dir_link/file.txt")).unwrap(), "x");
    assert!(fs::symlink_metadata(dst.join("data")).unwrap().is_dir());
}

#[test]
fn execute_bits_reach_destination() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let script = src.join("run.sh");
    fs::write(&script, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let dst = td.path().join("dst");
    copy_tree(&src, &dst).unwrap();

    let mode = fs::metadata(dst.join("run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn modification_time_is_carried_over() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let file = src.join("old.txt");
    fs::write(&file, "old").unwrap();
    let past = FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&file, past).unwrap();

    let dst = td.path().join("dst");
    copy_tree(&src, &dst).unwrap();

    let meta = fs::metadata(dst.join("old.txt")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), past);
}

#[test]
fn existing_symlink_at_destination_is_not_written_through() {
    let td = tempdir().unwrap();
    let outside = td.path().join("outside.txt");
    fs::write(&outside, "precious").unwrap();

    let src = td.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("f.txt"), "new").unwrap();

    let dst = td.path().join("dst");
    fs::create_dir_all(&dst).unwrap();
    symlink(&outside, dst.join("f.txt")).unwrap();

    copy_dir(&src, &dst, OverwritePolicy::Merge).unwrap();

    assert_eq!(fs::read_to_string(&outside).unwrap(), "precious");
    assert!(!fs::symlink_metadata(dst.join("f.txt")).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(dst.join("f.txt")).unwrap(), "new");
}

#[test]
fn directory_symlink_at_destination_is_replaced_not_merged_into() {
    let td = tempdir().unwrap();
    let outside = td.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("keep.txt"), "precious").unwrap();

    let src = td.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("sub/new.txt"), "new").unwrap();
    fs::write(src.join("sub/keep.txt"), "clobber").unwrap();

    let dst = td.path().join("dst");
    fs::create_dir_all(&dst).unwrap();
    symlink(&outside, dst.join("sub")).unwrap();

    copy_dir(&src, &dst, OverwritePolicy::Merge).unwrap();

    assert_eq!(fs::read_to_string(outside.join("keep.txt")).unwrap(), "precious");
    assert!(!outside.join("new.txt").exists());
    let sub = fs::symlink_metadata(dst.join("sub")).unwrap();
    assert!(sub.is_dir() && !sub.file_type().is_symlink());
    assert_eq!(fs::read_to_string(dst.join("sub/new.txt")).unwrap(), "new");
    assert_eq!(fs::read_to_string(dst.join("sub/keep.txt")).unwrap(), "clobber");
}
