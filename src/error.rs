//! Error types for incremental VPK extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Archive-related errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to open archive {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid archive signature: 0x{0:08x}")]
    BadSignature(u32),

    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u32),

    #[error("Malformed directory tree: {0}")]
    MalformedTree(String),

    #[error("Archive part {index} not available for entry {entry}")]
    MissingPart { index: u16, entry: String },

    #[error("Archive I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Glob pattern errors
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Checksum cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Unrecognized checksum value at {path:?}: {value}")]
    InvalidLeaf { path: String, value: String },

    #[error("Failed to serialize checksum cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Per-entry extraction failures
///
/// These are logged and counted; they never abort a run.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Refusing unsafe destination path {0:?}")]
    UnsafePath(String),

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open entry: {0}")]
    Open(#[from] ArchiveError),

    #[error("Failed to read entry content: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output directory scan errors
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Top-level errors surfaced by the extraction and rescan pipelines
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ExtractError {
    fn from(err: config::ConfigError) -> Self {
        ExtractError::ConfigError(err.to_string())
    }
}
