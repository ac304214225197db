//! Path-indexed checksum tree
//!
//! Relative paths are split on `/`; every segment but the last names a
//! directory (`Branch`) and the last names a file (`Leaf`) holding the CRC-32 of
//! its content as of the last successful write.

use crate::error::CacheError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// A node in the checksum tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Directory: path segment -> child node
    Branch(BTreeMap<String, Node>),
    /// File: CRC-32 of the last extracted content
    Leaf(u32),
}

impl Node {
    fn branch() -> Self {
        Node::Branch(BTreeMap::new())
    }

    /// Children of this node, turning a leaf into an empty branch first.
    fn as_branch_mut(&mut self) -> &mut BTreeMap<String, Node> {
        if let Node::Leaf(_) = self {
            *self = Node::branch();
        }
        match self {
            Node::Branch(children) => children,
            Node::Leaf(_) => unreachable!("leaf was replaced by a branch"),
        }
    }

    fn count_leaves(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(children) => children.values().map(Node::count_leaves).sum(),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(checksum) => serializer.serialize_u32(*checksum),
            Node::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (segment, child) in children {
                    map.serialize_entry(segment, child)?;
                }
                map.end()
            }
        }
    }
}

/// Checksum cache keyed by slash-delimited relative paths
///
/// The root is always a branch. Serializes as nested JSON objects whose leaves
/// are unsigned 32-bit integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumTree {
    root: BTreeMap<String, Node>,
}

impl ChecksumTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the checksum stored for `path`.
    ///
    /// Missing or leaf-typed intermediate segments are replaced by empty
    /// branches on the way down, so a lookup through a stale file entry
    /// repairs the structure and reports the path as absent.
    pub fn get(&mut self, path: &str) -> Option<u32> {
        let (dirs, name) = split_path(path);
        let mut current = &mut self.root;
        for segment in dirs {
            current = descend(current, segment);
        }
        match current.get(name) {
            Some(Node::Leaf(checksum)) => Some(*checksum),
            _ => None,
        }
    }

    /// Record `checksum` for `path`, creating directories as needed.
    ///
    /// Whatever sat at the final segment is replaced, including a directory.
    pub fn set(&mut self, path: &str, checksum: u32) {
        let (dirs, name) = split_path(path);
        let mut current = &mut self.root;
        for segment in dirs {
            current = descend(current, segment);
        }
        if let Some(Node::Branch(children)) = current.insert(name.to_string(), Node::Leaf(checksum))
        {
            debug!(
                path,
                displaced_children = children.len(),
                "Directory entry replaced by file checksum"
            );
        }
    }

    /// Number of file checksums held
    pub fn len(&self) -> usize {
        self.root.values().map(Node::count_leaves).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All `(path, checksum)` pairs, sorted by path
    pub fn leaves(&self) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, "", &mut out);
        out
    }

    /// Build a tree from a decoded JSON object.
    ///
    /// Numeric leaves may arrive as floats; integral values within `u32` range
    /// are accepted, anything else is rejected.
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self, CacheError> {
        Ok(Self {
            root: branch_from_json(map, "")?,
        })
    }
}

impl Serialize for ChecksumTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.len()))?;
        for (segment, child) in &self.root {
            map.serialize_entry(segment, child)?;
        }
        map.end()
    }
}

fn split_path(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dirs, name)) => (dirs.split('/').collect(), name),
        None => (Vec::new(), path),
    }
}

fn descend<'a>(children: &'a mut BTreeMap<String, Node>, segment: &str) -> &'a mut BTreeMap<String, Node> {
    children
        .entry(segment.to_string())
        .or_insert_with(Node::branch)
        .as_branch_mut()
}

fn collect_leaves(children: &BTreeMap<String, Node>, prefix: &str, out: &mut Vec<(String, u32)>) {
    for (segment, node) in children {
        let path = join_key(prefix, segment);
        match node {
            Node::Leaf(checksum) => out.push((path, *checksum)),
            Node::Branch(grandchildren) => collect_leaves(grandchildren, &path, out),
        }
    }
}

fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", prefix, segment)
    }
}

fn branch_from_json(map: &Map<String, Value>, prefix: &str) -> Result<BTreeMap<String, Node>, CacheError> {
    let mut children = BTreeMap::new();
    for (segment, value) in map {
        let path = join_key(prefix, segment);
        let node = match value {
            Value::Object(inner) => Node::Branch(branch_from_json(inner, &path)?),
            Value::Number(number) => Node::Leaf(checksum_from_number(number).ok_or_else(|| {
                CacheError::InvalidLeaf {
                    path: path.clone(),
                    value: number.to_string(),
                }
            })?),
            other => {
                return Err(CacheError::InvalidLeaf {
                    path,
                    value: other.to_string(),
                })
            }
        };
        children.insert(segment.clone(), node);
    }
    Ok(children)
}

fn checksum_from_number(number: &Number) -> Option<u32> {
    if let Some(value) = number.as_u64() {
        return u32::try_from(value).ok();
    }
    if number.is_i64() {
        return None;
    }
    let value = number.as_f64()?;
    if value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}
