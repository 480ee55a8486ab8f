use derive_more::From;
use hashlink::LinkedHashMap;
use snafu::ensure;
use time::OffsetDateTime;

use super::error::{AlreadyExistsSnafu, FilesystemError};

pub const DIRECTORY_PERMISSIONS: &str = "rwxr-xr-x";
pub const FILE_PERMISSIONS: &str = "rw-r--r--";

/// Display-only attributes shared by every node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub permissions: String,
    pub owner: String,
}

impl Metadata {
    pub fn new(permissions: &str, owner: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            created_at: now,
            updated_at: now,
            permissions: permissions.to_string(),
            owner: owner.to_string(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// An entry of the virtual filesystem tree
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(directory) => directory.name(),
            Node::File(file) => file.name(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Node::Directory(directory) => directory.metadata(),
            Node::File(file) => file.metadata(),
        }
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Node::Directory(directory) => &mut directory.metadata,
            Node::File(file) => &mut file.metadata,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(directory) => Some(directory),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    name: String,
    metadata: Metadata,
    children: LinkedHashMap<String, Node>,
}

impl Directory {
    pub fn new(name: impl Into<String>, owner: &str) -> Self {
        Self::from_parts(
            name,
            Metadata::new(DIRECTORY_PERMISSIONS, owner),
            LinkedHashMap::new(),
        )
    }

    pub(crate) fn from_parts(
        name: impl Into<String>,
        metadata: Metadata,
        children: LinkedHashMap<String, Node>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Children in insertion order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn subdirectory(&self, name: &str) -> Option<&Directory> {
        self.child(name).and_then(Node::as_directory)
    }

    pub(crate) fn subdirectory_mut(&mut self, name: &str) -> Option<&mut Directory> {
        match self.children.get_mut(name) {
            Some(Node::Directory(directory)) => Some(directory),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds a child while building a layout whose names are known to be
    /// distinct. A child with the same name is replaced.
    pub(crate) fn with_child(mut self, node: impl Into<Node>) -> Self {
        let node = node.into();
        self.children.replace(node.name().to_string(), node);
        self
    }

    /// Inserts a child, refusing to shadow an existing sibling.
    pub(crate) fn try_insert(&mut self, node: Node) -> Result<(), FilesystemError> {
        ensure!(
            !self.children.contains_key(node.name()),
            AlreadyExistsSnafu { name: node.name() }
        );
        self.children.insert(node.name().to_string(), node);
        Ok(())
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    metadata: Metadata,
    content: String,
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<String>, owner: &str) -> Self {
        Self::from_parts(name, Metadata::new(FILE_PERMISSIONS, owner), content)
    }

    pub(crate) fn from_parts(
        name: impl Into<String>,
        metadata: Metadata,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata,
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Size in bytes, always derived from the current content
    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub(crate) fn write(&mut self, content: String) {
        self.content = content;
        self.metadata.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_rejects_duplicate_children() {
        let mut directory = Directory::new("docs", "user");
        directory
            .try_insert(File::new("a.txt", "", "user").into())
            .expect("first insert succeeds");

        let result = directory.try_insert(Directory::new("a.txt", "user").into());

        assert!(matches!(
            result,
            Err(FilesystemError::AlreadyExists { ref name }) if name == "a.txt"
        ));
        assert_eq!(directory.children().count(), 1);
        assert!(!directory.child("a.txt").unwrap().is_directory());
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut directory = Directory::new("root", "root");
        for name in ["zeta", "alpha", "mid"] {
            directory
                .try_insert(Directory::new(name, "root").into())
                .unwrap();
        }

        let names: Vec<_> = directory.children().map(Node::name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn file_size_follows_content() {
        let mut file = File::new("notes.txt", "hello", "user");
        assert_eq!(file.size(), 5);

        file.write("äö".to_string());
        assert_eq!(file.size(), 4);
        assert_eq!(file.content(), "äö");
    }

    #[test]
    fn write_refreshes_updated_at_only() {
        let mut file = File::new("notes.txt", "", "user");
        let created_at = file.metadata().created_at;

        file.write("changed".to_string());

        assert_eq!(file.metadata().created_at, created_at);
        assert!(file.metadata().updated_at >= created_at);
    }

    #[test]
    fn subdirectory_ignores_files() {
        let mut directory = Directory::new("home", "root");
        directory
            .try_insert(File::new("plain", "", "user").into())
            .unwrap();

        assert!(directory.subdirectory("plain").is_none());
        assert!(directory.subdirectory("missing").is_none());
    }
}
