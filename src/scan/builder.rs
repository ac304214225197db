//! Checksum cache builder for existing output directories

use crate::cache::ChecksumTree;
use crate::error::{ExtractError, ScanError};
use crate::scan::hasher;
use crate::scan::walker::{ScannedFile, Walker};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Outcome of a rescan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescanReport {
    /// Files hashed and recorded
    pub files: usize,
    /// Keys of files that could not be read (left out of the cache)
    pub failed: Vec<String>,
}

impl fmt::Display for RescanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} files checksummed", self.files)?;
        if !self.failed.is_empty() {
            write!(f, ", {} unreadable", self.failed.len())?;
        }
        Ok(())
    }
}

/// Builds a fresh [`ChecksumTree`] from disk state alone
pub struct CacheBuilder {
    root: PathBuf,
}

impl CacheBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walk the root and checksum every regular file
    ///
    /// A file that cannot be read is reported and omitted; a walk failure
    /// aborts the build.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<(ChecksumTree, RescanReport), ScanError> {
        let start = Instant::now();

        let files = Walker::new(self.root.clone()).walk()?;
        debug!(file_count = files.len(), "Walked output directory");

        let (tree, report) = checksum_files(files);

        info!(
            files = report.files,
            failed = report.failed.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Checksum tree rebuilt"
        );
        Ok((tree, report))
    }
}

/// Hash each scanned file into a fresh tree; unreadable files are reported and skipped
fn checksum_files(files: Vec<ScannedFile>) -> (ChecksumTree, RescanReport) {
    let mut tree = ChecksumTree::new();
    let mut report = RescanReport::default();

    for file in files {
        match hasher::checksum_file(&file.path) {
            Ok(checksum) => {
                debug!(path = %file.key, checksum, "Checksummed file");
                tree.set(&file.key, checksum);
                report.files += 1;
            }
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "Failed to read file, leaving it out of the cache");
                report.failed.push(file.key);
            }
        }
    }

    (tree, report)
}

/// Rebuild the checksum cache of `output_root` and overwrite its cache file
pub fn rescan(output_root: &Path) -> Result<RescanReport, ExtractError> {
    let (tree, report) = CacheBuilder::new(output_root.to_path_buf()).build()?;
    tree.save_to_disk(ChecksumTree::persistence_path(output_root))?;
    Ok(report)
}
