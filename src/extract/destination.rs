//! Resolution of archive paths under the output root

use crate::error::EntryError;
use std::path::{Component, Path, PathBuf};

/// Join an archive-relative path onto `root`.
///
/// Only plain segments are accepted; absolute paths, drive prefixes, `.` and
/// `..` would let an entry land outside the output root. An empty `relative`
/// resolves to the root itself when `allow_empty` is set.
pub fn resolve(root: &Path, relative: &str, allow_empty: bool) -> Result<PathBuf, EntryError> {
    if relative.is_empty() {
        return if allow_empty {
            Ok(root.to_path_buf())
        } else {
            Err(EntryError::UnsafePath(relative.to_string()))
        };
    }

    let mut resolved = root.to_path_buf();
    for segment in relative.split('/') {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => resolved.push(name),
            _ => return Err(EntryError::UnsafePath(relative.to_string())),
        }
    }
    Ok(resolved)
}
