//! Rescan
//!
//! Rebuilds the checksum cache from the files already present in an output
//! directory, without opening any archive.

pub mod builder;
pub mod hasher;
pub mod walker;

pub use builder::{rescan, CacheBuilder, RescanReport};
