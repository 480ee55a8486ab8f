//! JSON snapshot codec for the whole tree.
//!
//! The tree is stored as a flat array of entries in pre-order. Every entry
//! but the first names its parent by index, and a parent always comes before
//! its children, so neither encoding nor decoding recurses over the depth of
//! the tree.
//!
//! Decoding builds a complete new tree before anything is handed back, so a
//! rejected snapshot never touches the live filesystem.

use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, ensure};
use time::OffsetDateTime;

use super::error::{FilesystemError, InvalidSnapshotSnafu, SnapshotEncodeSnafu};
use super::node::{Directory, File, Metadata, Node};
use super::path;
use super::tree::ROOT_NAME;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SnapshotEntry {
    Directory {
        /// Index of the parent entry, absent for the root
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<usize>,
        name: String,
        #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
        created_at: OffsetDateTime,
        #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
        updated_at: OffsetDateTime,
        permissions: String,
        owner: String,
    },
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<usize>,
        name: String,
        #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
        created_at: OffsetDateTime,
        #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
        updated_at: OffsetDateTime,
        permissions: String,
        owner: String,
        content: String,
        size: usize,
    },
}

impl SnapshotEntry {
    fn new(node: &Node, parent: usize) -> Self {
        match node {
            Node::Directory(directory) => Self::directory(directory, Some(parent)),
            Node::File(file) => {
                let metadata = file.metadata();
                SnapshotEntry::File {
                    parent: Some(parent),
                    name: file.name().to_string(),
                    created_at: metadata.created_at,
                    updated_at: metadata.updated_at,
                    permissions: metadata.permissions.clone(),
                    owner: metadata.owner.clone(),
                    content: file.content().to_string(),
                    size: file.size(),
                }
            }
        }
    }

    fn directory(directory: &Directory, parent: Option<usize>) -> Self {
        let metadata = directory.metadata();
        SnapshotEntry::Directory {
            parent,
            name: directory.name().to_string(),
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
            permissions: metadata.permissions.clone(),
            owner: metadata.owner.clone(),
        }
    }

    fn parent(&self) -> Option<usize> {
        match self {
            SnapshotEntry::Directory { parent, .. } | SnapshotEntry::File { parent, .. } => *parent,
        }
    }

    fn is_directory(&self) -> bool {
        matches!(self, SnapshotEntry::Directory { .. })
    }

    /// The node this entry describes, without children
    fn into_node(self) -> Result<Node, FilesystemError> {
        match self {
            SnapshotEntry::Directory {
                name,
                created_at,
                updated_at,
                permissions,
                owner,
                ..
            } => {
                let metadata = Metadata {
                    created_at,
                    updated_at,
                    permissions,
                    owner,
                };
                Ok(Directory::from_parts(name, metadata, LinkedHashMap::new()).into())
            }
            SnapshotEntry::File {
                name,
                created_at,
                updated_at,
                permissions,
                owner,
                content,
                size,
                ..
            } => {
                ensure!(
                    size == content.len(),
                    InvalidSnapshotSnafu {
                        reason: format!("size of '{name}' does not match its content"),
                    }
                );
                let metadata = Metadata {
                    created_at,
                    updated_at,
                    permissions,
                    owner,
                };
                Ok(File::from_parts(name, metadata, content).into())
            }
        }
    }
}

pub fn encode(root: &Directory) -> Result<String, FilesystemError> {
    let mut entries = vec![SnapshotEntry::directory(root, None)];
    let mut pending: Vec<(usize, &Node)> = root.children().rev().map(|node| (0, node)).collect();

    while let Some((parent, node)) = pending.pop() {
        let index = entries.len();
        entries.push(SnapshotEntry::new(node, parent));
        if let Node::Directory(directory) = node {
            pending.extend(directory.children().rev().map(|child| (index, child)));
        }
    }

    serde_json::to_string(&entries).context(SnapshotEncodeSnafu)
}

pub fn decode(serialized: &str) -> Result<Directory, FilesystemError> {
    let entries: Vec<SnapshotEntry> =
        serde_json::from_str(serialized).map_err(|e| FilesystemError::InvalidSnapshot {
            reason: e.to_string(),
        })?;

    let is_root = matches!(
        entries.first(),
        Some(SnapshotEntry::Directory { parent: None, name, .. }) if name == ROOT_NAME
    );
    if !is_root {
        return invalid("first entry must be a directory named '/'");
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut depths = vec![0; entries.len()];
    for (index, entry) in entries.iter().enumerate().skip(1) {
        let parent = entry.parent().context(InvalidSnapshotSnafu {
            reason: format!("entry {index} has no parent"),
        })?;
        ensure!(
            parent < index && entries[parent].is_directory(),
            InvalidSnapshotSnafu {
                reason: format!("entry {index} has an invalid parent"),
            }
        );
        depths[index] = depths[parent] + 1;
        ensure!(
            !entry.is_directory() || depths[index] <= path::MAX_DEPTH,
            InvalidSnapshotSnafu {
                reason: format!("entry {index} is nested too deeply"),
            }
        );
        children[parent].push(index);
    }

    let mut nodes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let node = entry.into_node()?;
        if index > 0 {
            check_name(node.name())?;
        }
        nodes.push(Some(node));
    }

    // Children sit after their parent, so walking backwards finds every
    // directory's children already complete.
    for index in (0..nodes.len()).rev() {
        if children[index].is_empty() {
            continue;
        }
        let Some(Node::Directory(mut directory)) = nodes[index].take() else {
            return invalid(format!("entry {index} is not a directory"));
        };
        for &child_index in &children[index] {
            let child = nodes[child_index]
                .take()
                .context(InvalidSnapshotSnafu {
                    reason: format!("entry {child_index} is used twice"),
                })?;
            let child_name = child.name().to_string();
            directory.try_insert(child).map_err(|_| FilesystemError::InvalidSnapshot {
                reason: format!("duplicate entry '{child_name}' in '{}'", directory.name()),
            })?;
        }
        nodes[index] = Some(directory.into());
    }

    match nodes.into_iter().next().flatten() {
        Some(Node::Directory(root)) => Ok(root),
        _ => invalid("root must be a directory"),
    }
}

fn invalid<T>(reason: impl Into<String>) -> Result<T, FilesystemError> {
    InvalidSnapshotSnafu {
        reason: reason.into(),
    }
    .fail()
}

fn check_name(name: &str) -> Result<(), FilesystemError> {
    path::validate_name(name).map_err(|_| FilesystemError::InvalidSnapshot {
        reason: format!("invalid entry name '{name}'"),
    })
}
