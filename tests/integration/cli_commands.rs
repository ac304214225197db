//! Integration tests for the vpk-extract binary

use super::test_utils::write_single_vpk;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use vpk_extract::cache::CACHE_FILENAME;

/// Run the binary with user config and log variables isolated to `home`
fn vpk_extract(home: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_vpk-extract");
    Command::new(bin)
        .env("HOME", home.as_os_str())
        .env("XDG_CONFIG_HOME", home.join("config").as_os_str())
        .env_remove("VPK_EXTRACT_LOG")
        .env_remove("VPK_EXTRACT_LOG_OUTPUT")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_missing_arguments_exit_non_zero_without_io() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let out_str = out.to_string_lossy().to_string();

    let output = vpk_extract(temp.path(), &["extract", "-o", out_str.as_str()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--input"));
    assert!(!out.exists());

    let output = vpk_extract(temp.path(), &["crc"]);
    assert!(!output.status.success());
}

#[test]
fn test_extract_then_crc() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    write_single_vpk(&pak, &[("models/a.mdl", b"a"), ("sound/b.wav", b"b")]);
    let pak_str = pak.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();

    let output = vpk_extract(
        temp.path(),
        &["extract", "-i", pak_str.as_str(), "-o", out_str.as_str(), "*.mdl"],
    );
    assert!(
        output.status.success(),
        "extract should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "1 extracted, 0 unchanged, 0 failed (1 matched, 1 not matched)"
    );
    assert!(out.join("models").join("a.mdl").exists());
    assert!(out.join(CACHE_FILENAME).exists());

    let output = vpk_extract(temp.path(), &["crc", "-o", out_str.as_str()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "1 files checksummed"
    );
}

#[test]
fn test_missing_archive_exits_one() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("absent.vpk");
    let out = temp.path().join("out");
    let pak_str = pak.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();
    let output = vpk_extract(temp.path(), &["extract", "-i", pak_str.as_str(), "-o", out_str.as_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn test_config_file_supplies_patterns() {
    let temp = TempDir::new().unwrap();
    let pak = temp.path().join("pak.vpk");
    let out = temp.path().join("out");
    let config = temp.path().join("vpk-extract.toml");
    write_single_vpk(&pak, &[("a.txt", b"a"), ("b.dat", b"b")]);
    fs::write(&config, "[extract]\npatterns = [\"*.dat\"]\n").unwrap();

    let config_str = config.to_string_lossy().to_string();
    let pak_str = pak.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();
    let output = vpk_extract(
        temp.path(),
        &["--config", config_str.as_str(), "extract", "-i", pak_str.as_str(), "-o", out_str.as_str()],
    );
    assert!(output.status.success());
    assert!(out.join("b.dat").exists());
    assert!(!out.join("a.txt").exists());
}
