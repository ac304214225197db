//! Valve pak (VPK) reader
//!
//! Supports version 1 and 2 directory files, both single-file paks and
//! multi-part paks (`<name>_dir.vpk` plus `<name>_000.vpk`, `<name>_001.vpk`, ...).

use crate::archive::{Archive, ArchiveEntry};
use crate::error::ArchiveError;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

const SIGNATURE: u32 = 0x55AA_1234;
const HEADER_SIZE_V1: u64 = 12;
const HEADER_SIZE_V2: u64 = 28;
const ENTRY_TERMINATOR: u16 = 0xFFFF;

/// Archive index meaning "data follows the directory tree in this file"
pub const EMBEDDED_INDEX: u16 = 0x7FFF;

/// Suffix identifying the index file of a multi-part pak
pub const DIR_SUFFIX: &str = "_dir.vpk";

/// One file inside a VPK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpkEntry {
    path: String,
    directory: String,
    crc: u32,
    preload: Vec<u8>,
    archive_index: u16,
    offset: u32,
    length: u32,
}

impl ArchiveEntry for VpkEntry {
    fn path(&self) -> &str {
        &self.path
    }

    fn directory(&self) -> &str {
        &self.directory
    }

    fn crc(&self) -> u32 {
        self.crc
    }
}

#[derive(Debug, Clone)]
enum Layout {
    /// Everything lives in one file
    Single,
    /// Part files share this prefix: `<prefix>_NNN.vpk`
    Multi { prefix: String },
}

/// An opened VPK
#[derive(Debug)]
pub struct VpkArchive {
    path: PathBuf,
    layout: Layout,
    version: u32,
    data_offset: u64,
    entries: Vec<VpkEntry>,
}

impl VpkArchive {
    /// Open a pak, choosing the multi-part layout when the path ends in `_dir.vpk`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        if path.to_string_lossy().ends_with(DIR_SUFFIX) {
            Self::open_dir(path)
        } else {
            Self::open_single(path)
        }
    }

    /// Open a single-file pak
    pub fn open_single<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        Self::open_with_layout(path.as_ref(), Layout::Single)
    }

    /// Open the directory file of a multi-part pak
    pub fn open_dir<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy();
        let prefix = path_str
            .strip_suffix(DIR_SUFFIX)
            .unwrap_or(&path_str)
            .to_string();
        Self::open_with_layout(path, Layout::Multi { prefix })
    }

    #[instrument(skip_all, fields(archive = %path.display()))]
    fn open_with_layout(path: &Path, layout: Layout) -> Result<Self, ArchiveError> {
        let open_err = |source: std::io::Error| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(open_err)?;

        let mut header = [0u8; 12];
        file.read_exact(&mut header).map_err(open_err)?;
        let signature = le_u32(&header[0..4]);
        if signature != SIGNATURE {
            return Err(ArchiveError::BadSignature(signature));
        }
        let version = le_u32(&header[4..8]);
        let tree_size = le_u32(&header[8..12]);
        let header_size = match version {
            1 => HEADER_SIZE_V1,
            2 => HEADER_SIZE_V2,
            other => return Err(ArchiveError::UnsupportedVersion(other)),
        };

        let file_len = file.metadata().map_err(open_err)?.len();
        if header_size + u64::from(tree_size) > file_len {
            return Err(ArchiveError::MalformedTree(format!(
                "header claims a {} byte tree but the file holds {} bytes",
                tree_size, file_len
            )));
        }

        file.seek(SeekFrom::Start(header_size)).map_err(open_err)?;
        let mut tree = vec![0u8; tree_size as usize];
        file.read_exact(&mut tree).map_err(|e| {
            ArchiveError::MalformedTree(format!("directory tree shorter than {} bytes: {}", tree_size, e))
        })?;

        let entries = parse_tree(&tree)?;
        debug!(version, entries = entries.len(), "Parsed directory tree");

        Ok(Self {
            path: path.to_path_buf(),
            layout,
            version,
            data_offset: header_size + u64::from(tree_size),
            entries,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the file holding data for `archive_index`
    fn data_file(&self, entry: &VpkEntry) -> Result<(PathBuf, u64), ArchiveError> {
        if entry.archive_index == EMBEDDED_INDEX {
            return Ok((self.path.clone(), self.data_offset + u64::from(entry.offset)));
        }
        match &self.layout {
            Layout::Multi { prefix } => Ok((
                PathBuf::from(format!("{}_{:03}.vpk", prefix, entry.archive_index)),
                u64::from(entry.offset),
            )),
            Layout::Single => Err(ArchiveError::MissingPart {
                index: entry.archive_index,
                entry: entry.path.clone(),
            }),
        }
    }
}

impl Archive for VpkArchive {
    type Entry = VpkEntry;

    fn entries(&self) -> &[VpkEntry] {
        &self.entries
    }

    fn open_entry<'a>(&'a self, entry: &'a VpkEntry) -> Result<Box<dyn Read + 'a>, ArchiveError> {
        let preload = Cursor::new(entry.preload.as_slice());
        if entry.length == 0 {
            return Ok(Box::new(preload));
        }

        let (data_path, offset) = self.data_file(entry)?;
        let mut file = File::open(&data_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::MissingPart {
                    index: entry.archive_index,
                    entry: entry.path.clone(),
                }
            } else {
                ArchiveError::IoError(e)
            }
        })?;

        let available = file.metadata()?.len();
        let end = offset + u64::from(entry.length);
        if end > available {
            return Err(ArchiveError::IoError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "{} needs bytes {}..{} of {:?} but it holds {}",
                    entry.path,
                    offset,
                    end,
                    data_path,
                    available
                ),
            )));
        }

        file.seek(SeekFrom::Start(offset))?;
        Ok(Box::new(preload.chain(file.take(u64::from(entry.length)))))
    }
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Cursor over the directory tree bytes
struct TreeReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TreeReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ArchiveError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                ArchiveError::MalformedTree(format!("unexpected end of tree at byte {}", self.pos))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16, ArchiveError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ArchiveError> {
        Ok(le_u32(self.take(4)?))
    }

    fn cstring(&mut self) -> Result<String, ArchiveError> {
        let rest = &self.bytes[self.pos..];
        let len = rest.iter().position(|b| *b == 0).ok_or_else(|| {
            ArchiveError::MalformedTree(format!("unterminated string at byte {}", self.pos))
        })?;
        let text = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(text)
    }
}

fn parse_tree(bytes: &[u8]) -> Result<Vec<VpkEntry>, ArchiveError> {
    let mut reader = TreeReader { bytes, pos: 0 };
    let mut entries = Vec::new();

    loop {
        let extension = reader.cstring()?;
        if extension.is_empty() {
            break;
        }
        loop {
            let directory = reader.cstring()?;
            if directory.is_empty() {
                break;
            }
            loop {
                let name = reader.cstring()?;
                if name.is_empty() {
                    break;
                }
                entries.push(read_entry(&mut reader, &extension, &directory, &name)?);
            }
        }
    }

    Ok(entries)
}

fn read_entry(
    reader: &mut TreeReader<'_>,
    extension: &str,
    directory: &str,
    name: &str,
) -> Result<VpkEntry, ArchiveError> {
    let crc = reader.u32()?;
    let preload_len = reader.u16()?;
    let archive_index = reader.u16()?;
    let offset = reader.u32()?;
    let length = reader.u32()?;
    let terminator = reader.u16()?;
    if terminator != ENTRY_TERMINATOR {
        return Err(ArchiveError::MalformedTree(format!(
            "bad terminator 0x{:04x} after {}",
            terminator, name
        )));
    }
    let preload = reader.take(usize::from(preload_len))?.to_vec();

    // A single space stands for "none".
    let directory = if directory == " " { "" } else { directory };
    let file_name = if extension == " " {
        name.to_string()
    } else {
        format!("{}.{}", name, extension)
    };
    let path = if directory.is_empty() {
        file_name
    } else {
        format!("{}/{}", directory, file_name)
    };

    Ok(VpkEntry {
        path,
        directory: directory.to_string(),
        crc,
        preload,
        archive_index,
        offset,
        length,
    })
}
