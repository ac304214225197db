//! vpk-extract: Incremental VPK Extraction
//!
//! Extracts entries from Valve VPK archives into a directory, recording a CRC-32
//! per extracted file in a persisted checksum tree so later runs only rewrite
//! entries whose content changed.

pub mod archive;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pattern;
pub mod scan;
