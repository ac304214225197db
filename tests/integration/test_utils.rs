//! Shared test utilities for integration tests
//!
//! Writes small VPK archives so extraction can be exercised end to end.

use std::fs;
use std::path::{Path, PathBuf};

const SIGNATURE: u32 = 0x55AA_1234;
const EMBEDDED_INDEX: u16 = 0x7FFF;
const TERMINATOR: u16 = 0xFFFF;

/// Split `dir/name.ext` into the three tree levels, using " " for absent parts
fn tree_parts(path: &str) -> (String, String, String) {
    let (directory, file) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (" ", path),
    };
    let (name, extension) = match file.rfind('.') {
        Some(idx) => (&file[..idx], &file[idx + 1..]),
        None => (file, " "),
    };
    (extension.to_string(), directory.to_string(), name.to_string())
}

/// Encode the directory tree; each file gets its own extension and directory group
fn encode_tree(files: &[(&str, &[u8])], archive_index: u16) -> Vec<u8> {
    let mut tree = Vec::new();
    let mut offset = 0u32;
    for (path, content) in files {
        let (extension, directory, name) = tree_parts(path);
        for s in [&extension, &directory, &name] {
            tree.extend_from_slice(s.as_bytes());
            tree.push(0);
        }
        tree.extend_from_slice(&crc32fast::hash(content).to_le_bytes());
        tree.extend_from_slice(&0u16.to_le_bytes());
        tree.extend_from_slice(&archive_index.to_le_bytes());
        tree.extend_from_slice(&offset.to_le_bytes());
        tree.extend_from_slice(&(content.len() as u32).to_le_bytes());
        tree.extend_from_slice(&TERMINATOR.to_le_bytes());
        tree.extend_from_slice(&[0, 0]);
        offset += content.len() as u32;
    }
    tree.push(0);
    tree
}

fn concat(files: &[(&str, &[u8])]) -> Vec<u8> {
    files.iter().flat_map(|(_, c)| c.iter().copied()).collect()
}

/// Write a version 1 single-file archive holding `files` in order
pub fn write_single_vpk(path: &Path, files: &[(&str, &[u8])]) {
    let tree = encode_tree(files, EMBEDDED_INDEX);
    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(tree.len() as u32).to_le_bytes());
    out.extend_from_slice(&tree);
    out.extend_from_slice(&concat(files));
    fs::write(path, out).unwrap();
}

/// Write a version 2 `<stem>_dir.vpk` index with all data in `<stem>_000.vpk`.
/// Returns the index path.
pub fn write_multi_vpk(dir: &Path, stem: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let tree = encode_tree(files, 0);
    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(tree.len() as u32).to_le_bytes());
    for _ in 0..4 {
        out.extend_from_slice(&0u32.to_le_bytes());
    }
    out.extend_from_slice(&tree);

    let index = dir.join(format!("{}_dir.vpk", stem));
    fs::write(&index, out).unwrap();
    fs::write(dir.join(format!("{}_000.vpk", stem)), concat(files)).unwrap();
    index
}
