//! Output directory walker

use crate::cache::{CACHE_FILENAME, CACHE_TEMP_FILENAME};
use crate::error::ScanError;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Absolute (or root-joined) path on disk
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated on every platform
    pub key: String,
}

/// Root-relative keys the walk never reports: the cache and its in-flight temp file
const EXCLUDED_KEYS: [&str; 2] = [CACHE_FILENAME, CACHE_TEMP_FILENAME];

/// Recursive walker over an extraction output directory
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Collect every regular file below the root, sorted by key
    pub fn walk(&self) -> Result<Vec<ScannedFile>, ScanError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|source| ScanError::Walk {
                root: self.root.clone(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let key = slash_key(relative);
            if EXCLUDED_KEYS.contains(&key.as_str()) {
                continue;
            }

            files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                key,
            });
        }

        files.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(files)
    }
}

/// Join the normal components of `relative` with `/`
pub fn slash_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
