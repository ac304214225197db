//! Incremental Extraction Pipeline
//!
//! Walks archive entries in order, extracts those selected by the pattern set
//! whose checksum differs from the cached one, and persists the updated cache
//! once the loop ends, whether it ran to completion or was cancelled.

pub mod cancel;
pub mod destination;
pub mod report;

pub use cancel::CancellationToken;
pub use report::ExtractReport;

use crate::archive::{Archive, ArchiveEntry, VpkArchive};
use crate::cache::ChecksumTree;
use crate::error::{EntryError, ExtractError};
use crate::pattern::PatternSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

/// Extraction settings
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory receiving extracted files and the checksum cache
    pub output_root: PathBuf,
    /// Pause after every file written
    pub delay: Duration,
}

impl ExtractOptions {
    pub fn new(output_root: PathBuf) -> Self {
        Self {
            output_root,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Extraction pipeline over one opened archive
pub struct Extractor<'a, A: Archive> {
    archive: &'a A,
    patterns: &'a PatternSet,
    options: ExtractOptions,
    cancel: CancellationToken,
}

impl<'a, A: Archive> Extractor<'a, A> {
    pub fn new(archive: &'a A, patterns: &'a PatternSet, options: ExtractOptions) -> Self {
        Self {
            archive,
            patterns,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe `token` between entries
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Load the cache, extract, and save the cache
    ///
    /// Per-entry failures are logged and counted in the report. Only cache
    /// errors (a foreign leaf on load, an I/O failure on save) are returned.
    #[instrument(skip(self), fields(output = %self.options.output_root.display()))]
    pub fn run(&self) -> Result<ExtractReport, ExtractError> {
        let start = Instant::now();
        let cache_path = ChecksumTree::persistence_path(&self.options.output_root);
        let mut tree = ChecksumTree::load_from_disk(&cache_path)?;

        info!(
            entries = self.archive.entries().len(),
            patterns = self.patterns.len(),
            cached = tree.len(),
            "Starting extraction"
        );

        let report = self.extract_into(&mut tree);
        tree.save_to_disk(&cache_path)?;

        info!(
            extracted = report.extracted,
            unchanged = report.unchanged,
            failed = report.failed.len(),
            cancelled = report.cancelled,
            duration_ms = start.elapsed().as_millis() as u64,
            "Extraction finished"
        );
        Ok(report)
    }

    /// Run the entry loop against an in-memory tree without touching the cache file
    pub fn extract_into(&self, tree: &mut ChecksumTree) -> ExtractReport {
        let entries = self.archive.entries();
        let mut report = ExtractReport::default();

        for entry in entries {
            self.process_entry(entry, tree, &mut report);

            if self.cancel.is_cancelled() {
                warn!(
                    visited = report.visited(),
                    remaining = entries.len() - report.visited(),
                    "Interrupted, skipping remaining entries"
                );
                report.cancelled = true;
                break;
            }
        }

        report
    }

    fn process_entry(&self, entry: &A::Entry, tree: &mut ChecksumTree, report: &mut ExtractReport) {
        let path = entry.path();

        let Some(pattern_index) = self.patterns.first_match(path) else {
            trace!(path, "No pattern matched");
            report.unmatched += 1;
            return;
        };
        report.matched += 1;

        let checksum = entry.crc();
        if tree.get(path) == Some(checksum) {
            debug!(path, checksum, "Unchanged, skipping");
            report.unchanged += 1;
            return;
        }

        match self.write_entry(entry) {
            Ok(destination) => {
                tree.set(path, checksum);
                report.extracted += 1;
                info!(
                    path = %destination.display(),
                    pattern = self.patterns.pattern(pattern_index).unwrap_or_default(),
                    "Extracted"
                );
                if !self.options.delay.is_zero() {
                    thread::sleep(self.options.delay);
                }
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to extract entry");
                report.failed.push(path.to_string());
            }
        }
    }

    fn write_entry(&self, entry: &A::Entry) -> Result<PathBuf, EntryError> {
        let root = &self.options.output_root;
        let destination = destination::resolve(root, entry.path(), false)?;
        let directory = destination::resolve(root, entry.directory(), true)?;

        fs::create_dir_all(&directory).map_err(|source| EntryError::CreateDir {
            path: directory.clone(),
            source,
        })?;

        let mut content = Vec::new();
        self.archive
            .open_entry(entry)?
            .read_to_end(&mut content)
            .map_err(EntryError::Read)?;

        fs::write(&destination, &content).map_err(|source| EntryError::Write {
            path: destination.clone(),
            source,
        })?;

        Ok(destination)
    }
}

/// Open the VPK at `archive_path` and run an extraction into `options.output_root`
pub fn extract_archive(
    archive_path: &Path,
    patterns: &PatternSet,
    options: ExtractOptions,
    cancel: CancellationToken,
) -> Result<ExtractReport, ExtractError> {
    let archive = VpkArchive::open(archive_path)?;
    info!(
        archive = %archive.path().display(),
        version = archive.version(),
        entries = archive.entries().len(),
        "Opened archive"
    );
    Extractor::new(&archive, patterns, options)
        .with_cancellation(cancel)
        .run()
}
