//! Virtual filesystem: an in-memory tree of directories and files with a
//! working directory, path resolution and snapshot support.

mod error;
mod node;
pub mod path;
mod snapshot;
mod tree;

pub use error::FilesystemError;
pub use node::{Directory, File, Metadata, Node};
pub use tree::VirtualFilesystem;
