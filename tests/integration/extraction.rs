//! End-to-end extraction against archives written to disk

use super::test_utils::{write_multi_vpk, write_single_vpk};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vpk_extract::cache::{ChecksumTree, CACHE_FILENAME};
use vpk_extract::error::ExtractError;
use vpk_extract::extract::{extract_archive, CancellationToken, ExtractOptions};
use vpk_extract::pattern::PatternSet;

fn run(archive: &Path, out: &Path, patterns: &[&str]) -> vpk_extract::extract::ExtractReport {
    let patterns = PatternSet::new(patterns).unwrap();
    extract_archive(
        archive,
        &patterns,
        ExtractOptions::new(out.to_path_buf()),
        CancellationToken::new(),
    )
    .unwrap()
}

fn cached(out: &Path, key: &str) -> Option<u32> {
    ChecksumTree::load_from_disk(ChecksumTree::persistence_path(out))
        .unwrap()
        .get(key)
}

#[test]
fn test_second_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(
        &pak,
        &[
            ("models/props/barrel.mdl", b"barrel"),
            ("materials/wood.vmt", b"wood"),
            ("readme.txt", b"hello"),
        ],
    );

    let first = run(&pak, &out, &[]);
    assert_eq!(first.extracted, 3);
    assert_eq!(
        fs::read(out.join("models").join("props").join("barrel.mdl")).unwrap(),
        b"barrel"
    );
    assert_eq!(fs::read(out.join("readme.txt")).unwrap(), b"hello");
    assert_eq!(cached(&out, "materials/wood.vmt"), Some(crc32fast::hash(b"wood")));

    let modified = fs::metadata(out.join("readme.txt")).unwrap().modified().unwrap();
    let second = run(&pak, &out, &[]);
    assert_eq!(second.extracted, 0);
    assert_eq!(second.unchanged, 3);
    assert_eq!(
        fs::metadata(out.join("readme.txt")).unwrap().modified().unwrap(),
        modified
    );
}

#[test]
fn test_changed_entry_is_rewritten() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(&pak, &[("a.txt", b"one"), ("b.txt", b"same")]);
    run(&pak, &out, &[]);

    write_single_vpk(&pak, &[("a.txt", b"two"), ("b.txt", b"same")]);
    let report = run(&pak, &out, &[]);
    assert_eq!(report.extracted, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"two");
    assert_eq!(cached(&out, "a.txt"), Some(crc32fast::hash(b"two")));
}

#[test]
fn test_only_matching_entries_extracted() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(
        &pak,
        &[("models/a.mdl", b"a"), ("sound/b.wav", b"b"), ("models/c.vtx", b"c")],
    );

    let report = run(&pak, &out, &["*.mdl", "sound/*"]);
    assert_eq!(report.matched, 2);
    assert_eq!(report.unmatched, 1);
    assert!(out.join("models").join("a.mdl").exists());
    assert!(out.join("sound").join("b.wav").exists());
    assert!(!out.join("models").join("c.vtx").exists());
    assert_eq!(cached(&out, "models/c.vtx"), None);
}

#[test]
fn test_float_checksums_in_cache_are_honoured() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    write_single_vpk(&pak, &[("dir/a.txt", b"payload")]);
    fs::write(
        out.join(CACHE_FILENAME),
        format!("{{\"dir\": {{\"a.txt\": {}.0}}}}", crc32fast::hash(b"payload")),
    )
    .unwrap();

    let report = run(&pak, &out, &[]);
    assert_eq!(report.unchanged, 1);
    assert!(!out.join("dir").join("a.txt").exists());
}

#[test]
fn test_foreign_cache_leaf_aborts_run() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    write_single_vpk(&pak, &[("a.txt", b"a")]);
    fs::write(out.join(CACHE_FILENAME), r#"{"a.txt": "deadbeef"}"#).unwrap();

    let patterns = PatternSet::new(&["*"]).unwrap();
    let result = extract_archive(
        &pak,
        &patterns,
        ExtractOptions::new(out.clone()),
        CancellationToken::new(),
    );
    assert!(matches!(result, Err(ExtractError::Cache(_))));
    assert!(!out.join("a.txt").exists());
}

#[test]
fn test_cancelled_run_keeps_finished_work() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(&pak, &[("a.txt", b"a"), ("b.txt", b"b"), ("c.txt", b"c")]);

    let token = CancellationToken::new();
    token.cancel();
    let patterns = PatternSet::new(&["*"]).unwrap();
    let report = extract_archive(&pak, &patterns, ExtractOptions::new(out.clone()), token).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.extracted, 1);
    assert_eq!(cached(&out, "a.txt"), Some(crc32fast::hash(b"a")));
    assert_eq!(cached(&out, "b.txt"), None);

    // A later run picks up where the cancelled one stopped.
    let resumed = run(&pak, &out, &[]);
    assert_eq!(resumed.unchanged, 1);
    assert_eq!(resumed.extracted, 2);
}

#[test]
fn test_multi_part_archive_extracts() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let index = write_multi_vpk(
        temp.path(),
        "pak01",
        &[("scripts/game.txt", b"game"), ("scripts/items.txt", b"items")],
    );

    let report = run(&index, &out, &[]);
    assert_eq!(report.extracted, 2);
    assert_eq!(
        fs::read(out.join("scripts").join("items.txt")).unwrap(),
        b"items"
    );
}

#[test]
fn test_missing_part_file_is_per_entry_failure() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let index = write_multi_vpk(temp.path(), "pak01", &[("a.txt", b"a")]);
    fs::remove_file(temp.path().join("pak01_000.vpk")).unwrap();

    let report = run(&index, &out, &[]);
    assert_eq!(report.failed, vec!["a.txt".to_string()]);
    assert_eq!(cached(&out, "a.txt"), None);
}
