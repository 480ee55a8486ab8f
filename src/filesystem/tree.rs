use snafu::{OptionExt, ensure};
use tracing::{debug, info};

use super::error::{
    FilesystemError, IsADirectorySnafu, NotEmptySnafu, NotFoundSnafu, TooDeepSnafu,
};
use super::node::{Directory, File, Node};
use super::path;
use super::snapshot;

pub const ROOT_NAME: &str = "/";
pub const ROOT_OWNER: &str = "root";
pub const STANDARD_DIRECTORIES: [&str; 6] = ["bin", "etc", "home", "tmp", "usr", "var"];
pub const WELCOME_FILE_NAME: &str = "welcome.txt";
pub const WELCOME_FILE_CONTENT: &str =
    "Welcome to Mini Core Web!\nType \"help\" to see available commands.";

/// In-memory filesystem with a working directory.
///
/// The working path only ever holds segments that resolved to a directory
/// at the time it was set, and entries can only be removed from inside the
/// working directory, so it cannot end up pointing at a deleted node.
#[derive(Debug, Clone)]
pub struct VirtualFilesystem {
    root: Directory,
    working_path: Vec<String>,
    user: String,
}

impl VirtualFilesystem {
    pub fn new(user: impl Into<String>) -> Self {
        let user = user.into();
        Self {
            root: Self::initial_layout(&user),
            working_path: Vec::new(),
            user,
        }
    }

    fn initial_layout(user: &str) -> Directory {
        let home = Directory::new(user, user)
            .with_child(File::new(WELCOME_FILE_NAME, WELCOME_FILE_CONTENT, user));

        STANDARD_DIRECTORIES
            .into_iter()
            .map(|name| match name {
                "home" => Directory::new(name, ROOT_OWNER).with_child(home.clone()),
                _ => Directory::new(name, ROOT_OWNER),
            })
            .fold(Directory::new(ROOT_NAME, ROOT_OWNER), Directory::with_child)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn home_path(&self) -> String {
        format!("/home/{}", self.user)
    }

    pub fn current_path(&self) -> String {
        path::render(&self.working_path)
    }

    fn current_directory_mut(&mut self) -> Result<&mut Directory, FilesystemError> {
        path::directory_at_mut(&mut self.root, &self.working_path).with_context(|| {
            NotFoundSnafu {
                path: path::render(&self.working_path),
            }
        })
    }

    pub fn resolve_directory(&self, path: &str) -> Result<&Directory, FilesystemError> {
        let segments = path::resolve_segments(&self.root, &self.working_path, path)?;
        path::directory_at(&self.root, &segments).context(NotFoundSnafu { path })
    }

    /// Moves the working directory. On failure the working path is untouched.
    pub fn change_directory(&mut self, path: &str) -> Result<(), FilesystemError> {
        let segments = path::resolve_segments(&self.root, &self.working_path, path)?;
        self.working_path = segments;
        debug!("Changed directory to {}", self.current_path());
        Ok(())
    }

    /// Children of `path` (the working directory when `None`) in insertion order
    pub fn list(&self, path: Option<&str>) -> Result<Vec<&Node>, FilesystemError> {
        let directory = self.resolve_directory(path.unwrap_or("."))?;
        Ok(directory.children().collect())
    }

    pub fn create_directory(&mut self, name: &str) -> Result<(), FilesystemError> {
        path::validate_name(name)?;
        ensure!(
            self.working_path.len() < path::MAX_DEPTH,
            TooDeepSnafu { name }
        );
        let directory = Directory::new(name, &self.user);
        self.current_directory_mut()?.try_insert(directory.into())?;
        debug!("Created directory {name} in {}", self.current_path());
        Ok(())
    }

    /// Creates a file, or overwrites the content of an existing one.
    pub fn create_file(
        &mut self,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), FilesystemError> {
        path::validate_name(name)?;
        let owner = self.user.clone();
        let parent = self.current_directory_mut()?;

        match parent.child_mut(name) {
            Some(Node::File(file)) => {
                file.write(content.into());
                debug!("Overwrote file {name}");
                return Ok(());
            }
            Some(Node::Directory(_)) => return IsADirectorySnafu { name }.fail(),
            None => {}
        }

        parent.try_insert(File::new(name, content, &owner).into())?;
        debug!("Created file {name}");
        Ok(())
    }

    /// Refreshes the modification time of an entry, creating an empty file
    /// when nothing with that name exists.
    pub fn touch(&mut self, name: &str) -> Result<(), FilesystemError> {
        path::validate_name(name)?;
        let owner = self.user.clone();
        let parent = self.current_directory_mut()?;

        if let Some(node) = parent.child_mut(name) {
            node.metadata_mut().touch();
            debug!("Touched {name}");
            return Ok(());
        }

        parent.try_insert(File::new(name, "", &owner).into())
    }

    pub fn get_file(&self, path: &str) -> Result<&File, FilesystemError> {
        let (parent, name) = path::split_parent(path).context(NotFoundSnafu { path })?;
        let directory = self
            .resolve_directory(parent)
            .ok()
            .context(NotFoundSnafu { path })?;

        directory
            .child(name)
            .and_then(Node::as_file)
            .context(NotFoundSnafu { path })
    }

    /// Removes an entry of the working directory.
    pub fn remove(&mut self, name: &str, recursive: bool) -> Result<(), FilesystemError> {
        let parent = self.current_directory_mut()?;

        match parent.child(name) {
            None => return NotFoundSnafu { path: name }.fail(),
            Some(Node::Directory(directory)) => {
                ensure!(recursive || directory.is_empty(), NotEmptySnafu { name })
            }
            Some(Node::File(_)) => {}
        }

        parent.remove(name);
        debug!("Removed {name} (recursive: {recursive})");
        Ok(())
    }

    pub fn serialize(&self) -> Result<String, FilesystemError> {
        snapshot::encode(&self.root)
    }

    /// Replaces the whole tree with a snapshot. A snapshot that fails to
    /// decode leaves the current tree and working path as they were.
    pub fn restore(&mut self, serialized: &str) -> Result<(), FilesystemError> {
        let root = snapshot::decode(serialized)?;
        self.root = root;
        self.working_path.clear();
        info!("Restored filesystem snapshot");
        Ok(())
    }

    pub fn reset(&mut self) {
        self.root = Self::initial_layout(&self.user);
        self.working_path.clear();
        info!("Filesystem reset to the initial layout");
    }
}
