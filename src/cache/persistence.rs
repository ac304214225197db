//! On-disk form of the checksum tree

use crate::cache::tree::ChecksumTree;
use crate::error::CacheError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the checksum cache file at the root of the output directory
pub const CACHE_FILENAME: &str = "vpk_extract.crc.json";

/// Sibling file the cache is written to before being renamed into place
pub const CACHE_TEMP_FILENAME: &str = "vpk_extract.crc.json.tmp";

impl ChecksumTree {
    /// Location of the cache file for an output root
    pub fn persistence_path(output_root: &Path) -> PathBuf {
        output_root.join(CACHE_FILENAME)
    }

    /// Load the checksum tree from disk
    ///
    /// A missing, unreadable or syntactically broken file yields an empty
    /// tree. A well-formed file holding a non-numeric or non-integral leaf is
    /// an error.
    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let path = path.as_ref();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No checksum cache, starting empty");
                return Ok(ChecksumTree::new());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read checksum cache, starting empty");
                return Ok(ChecksumTree::new());
            }
        };

        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupted checksum cache, starting empty");
                return Ok(ChecksumTree::new());
            }
        };

        match value {
            Value::Object(map) => {
                let tree = ChecksumTree::from_json_map(&map)?;
                debug!(path = %path.display(), entries = tree.len(), "Loaded checksum cache");
                Ok(tree)
            }
            other => {
                warn!(
                    path = %path.display(),
                    found = json_kind(&other),
                    "Checksum cache is not an object, starting empty"
                );
                Ok(ChecksumTree::new())
            }
        }
    }

    /// Save the checksum tree to disk, replacing any previous file
    pub fn save_to_disk<P: AsRef<Path>>(&self, path: P) -> Result<(), CacheError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_vec(self)?;

        // Write to temporary file (atomic write)
        let temp_path = temp_path_for(path);
        fs::write(&temp_path, &serialized)?;

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::IoError(e));
        }

        debug!(path = %path.display(), entries = self.len(), "Saved checksum cache");
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
