use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use transync_fs::{NormalizedPath, io};

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("en/sub/foo.po"));

    io::write_atomic(&path, b"msgid \"a\"").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "msgid \"a\"");
}

#[test]
fn test_write_atomic_overwrites_and_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("foo.po");
    fs::write(&file_path, "original").unwrap();

    io::write_atomic(&NormalizedPath::new(&file_path), b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_remove_file_missing_is_ok() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.po"));
    io::remove_file(&path).unwrap();
}

#[test]
fn test_read_bytes_missing_reports_not_found() {
    let temp = TempDir::new().unwrap();
    let err = io::read_bytes(&NormalizedPath::new(temp.path().join("nope.po"))).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_list_files_is_sorted_and_skips_hidden_dirs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("fr")).unwrap();
    fs::create_dir_all(root.join("en")).unwrap();
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    fs::write(root.join("fr/foo.po"), "fr").unwrap();
    fs::write(root.join("en/foo.po"), "en").unwrap();
    fs::write(root.join(".git/objects/blob"), "x").unwrap();

    let root = NormalizedPath::new(root);
    let files: Vec<String> = io::list_files(&root)
        .unwrap()
        .iter()
        .filter_map(|p| root.backend_path_of(p))
        .collect();

    assert_eq!(files, vec!["/en/foo.po".to_string(), "/fr/foo.po".to_string()]);
}

#[test]
fn test_list_files_of_missing_root_is_empty() {
    let temp = TempDir::new().unwrap();
    let root = NormalizedPath::new(temp.path().join("absent"));
    assert!(io::list_files(&root).unwrap().is_empty());
}
