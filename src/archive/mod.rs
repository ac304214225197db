//! Archive access
//!
//! The extraction pipeline only sees archives through [`Archive`]: an ordered
//! list of entries, each carrying its own relative path and CRC-32, and a way to
//! stream an entry's content. [`vpk::VpkArchive`] is the production reader.

pub mod vpk;

use crate::error::ArchiveError;
use std::io::Read;

pub use vpk::{VpkArchive, VpkEntry};

/// Read-only view of one file stored in an archive
pub trait ArchiveEntry {
    /// Slash-separated path relative to the archive root
    fn path(&self) -> &str;

    /// Directory portion of [`ArchiveEntry::path`] (empty at the root)
    fn directory(&self) -> &str;

    /// CRC-32 of the entry content as recorded by the archive
    fn crc(&self) -> u32;
}

/// An opened archive
pub trait Archive {
    type Entry: ArchiveEntry;

    /// Entries in enumeration order
    fn entries(&self) -> &[Self::Entry];

    /// Open a content stream for `entry`
    fn open_entry<'a>(&'a self, entry: &'a Self::Entry) -> Result<Box<dyn Read + 'a>, ArchiveError>;
}
