use modconf::shared::fs_atomic::atomic_write_file;
use std::fs;

#[test]
fn shared_fs_atomic_replaces_file_contents() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("nested/api_token.txt");

    fs::create_dir_all(target.parent().expect("parent")).expect("mkdir");
    atomic_write_file(&target, b"first").expect("write first");
    assert_eq!(fs::read_to_string(&target).expect("read first"), "first");

    atomic_write_file(&target, b"second").expect("write second");
    assert_eq!(fs::read_to_string(&target).expect("read second"), "second");

    let leftovers: Vec<_> = fs::read_dir(target.parent().expect("parent"))
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn shared_fs_atomic_fails_when_parent_is_missing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("missing/api_token.txt");
    assert!(atomic_write_file(&target, b"x").is_err());
    assert!(!target.exists());
}
