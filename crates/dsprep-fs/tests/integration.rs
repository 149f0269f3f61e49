use std::io::Write;

use dsprep_fs::{AtomicFile, ensure_directory};
use tempfile::tempdir;

#[test]
fn atomic_file_inside_fresh_directory() {
    let dir = tempdir().unwrap();
    let target_dir = dir.path().join("downloads/cache");

    ensure_directory(&target_dir).unwrap();
    let path = target_dir.join("dataset.tar.gz");

    let mut file = AtomicFile::create(&path).unwrap();
    file.write_all(b"hello world").unwrap();
    file.commit().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    assert_eq!(std::fs::read_dir(&target_dir).unwrap().count(), 1);
}

#[test]
fn atomic_file_without_parent_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing/dataset.tar.gz");

    let result = AtomicFile::create(&path);
    assert!(matches!(result, Err(dsprep_fs::Error::Write { .. })));
}

#[test]
fn ensure_directory_twice() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("checkpoints");

    assert!(ensure_directory(&path).unwrap());
    assert!(!ensure_directory(&path).unwrap());
    assert!(path.is_dir());
}
