//! Cache rebuild from files already on disk

use super::test_utils::write_single_vpk;
use std::fs;
use tempfile::TempDir;
use vpk_extract::cache::{ChecksumTree, CACHE_FILENAME};
use vpk_extract::extract::{extract_archive, CancellationToken, ExtractOptions};
use vpk_extract::pattern::PatternSet;
use vpk_extract::scan::rescan;

#[test]
fn test_rescan_records_every_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a").join("b.txt"), "x").unwrap();
    fs::write(root.join("a").join("c.txt"), "y").unwrap();

    let report = rescan(root).unwrap();
    assert_eq!(report.files, 2);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join(CACHE_FILENAME)).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "a": {
                "b.txt": crc32fast::hash(b"x"),
                "c.txt": crc32fast::hash(b"y"),
            }
        })
    );
}

#[test]
fn test_rescan_ignores_its_own_cache_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "a").unwrap();

    rescan(root).unwrap();
    let report = rescan(root).unwrap();
    assert_eq!(report.files, 1);

    let mut tree = ChecksumTree::load_from_disk(root.join(CACHE_FILENAME)).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get(CACHE_FILENAME), None);
}

#[test]
fn test_rescan_then_extract_restores_deleted_file() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(&pak, &[("a.txt", b"a"), ("b.txt", b"b")]);
    let patterns = PatternSet::new(&["*"]).unwrap();
    let extract = || {
        extract_archive(
            &pak,
            &patterns,
            ExtractOptions::new(out.clone()),
            CancellationToken::new(),
        )
        .unwrap()
    };

    extract();
    fs::remove_file(out.join("b.txt")).unwrap();

    // The cache still claims b.txt is current.
    assert_eq!(extract().extracted, 0);

    rescan(&out).unwrap();
    let report = extract();
    assert_eq!(report.extracted, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(fs::read(out.join("b.txt")).unwrap(), b"b");
}
