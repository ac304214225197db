//! Checksum Cache
//!
//! Remembers the CRC-32 of every file written to the output directory so that
//! later runs can skip archive entries whose content has not changed.

pub mod persistence;
pub mod tree;

pub use persistence::{CACHE_FILENAME, CACHE_TEMP_FILENAME};
pub use tree::{ChecksumTree, Node};
