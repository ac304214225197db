//! CLI parse: clap types for vpk-extract. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vpk-extract - Incremental extraction of VPK archives
#[derive(Parser)]
#[command(name = "vpk-extract")]
#[command(about = "Extract files from a VPK archive, skipping files already extracted unchanged")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (added on top of the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (used when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract matching entries whose checksum differs from the recorded one
    Extract {
        /// VPK archive to read (a `_dir.vpk` path opens the multi-part set)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory; also holds the checksum cache
        #[arg(short, long)]
        output: PathBuf,

        /// Milliseconds to pause after each written file
        #[arg(short, long, value_name = "MS")]
        sleep: Option<u64>,

        /// Glob patterns, first match wins (default: "*")
        patterns: Vec<String>,
    },
    /// Rebuild the checksum cache from the files in the output directory
    Crc {
        /// Output directory to scan
        #[arg(short, long)]
        output: PathBuf,
    },
}
