use derive_more::Display;
use snafu::Snafu;

use crate::filesystem::FilesystemError;

/// Coarse classification of everything a command can fail with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    NotEmpty,
    InvalidArgument,
    PermissionDenied,
}

impl From<&FilesystemError> for ErrorKind {
    fn from(error: &FilesystemError) -> Self {
        match error {
            FilesystemError::NotFound { .. } => ErrorKind::NotFound,
            FilesystemError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            FilesystemError::NotEmpty { .. } => ErrorKind::NotEmpty,
            FilesystemError::IsADirectory { .. }
            | FilesystemError::InvalidName { .. }
            | FilesystemError::TooDeep { .. }
            | FilesystemError::InvalidSnapshot { .. }
            | FilesystemError::SnapshotEncodeError { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Failure of a single command. The dispatcher prefixes the display with the
/// command name, so messages start with what went wrong.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("missing {operand}"))]
    MissingOperand { operand: &'static str },
    #[snafu(display("invalid option '{option}'"))]
    UnknownOption { option: String },
    #[snafu(display("{path}: No such file"))]
    NoSuchFile { path: String },
    #[snafu(display("{path}: No such directory"))]
    NoSuchDirectory { path: String },
    #[snafu(display("cannot access '{path}': No such directory"))]
    CannotAccess { path: String },
    #[snafu(display("cannot create directory '{name}': {source}"))]
    CannotCreateDirectory {
        name: String,
        source: FilesystemError,
    },
    #[snafu(display("cannot touch '{name}': {source}"))]
    CannotTouch {
        name: String,
        source: FilesystemError,
    },
    #[snafu(display("cannot remove '{name}': {source}"))]
    CannotRemove {
        name: String,
        source: FilesystemError,
    },
    #[snafu(display("invalid pid '{pid}'"))]
    InvalidPid { pid: String },
    #[snafu(display("({pid}) - No such process"))]
    NoSuchProcess { pid: u32 },
    #[snafu(display("({pid}) - Permission denied"))]
    ProtectedProcess { pid: u32 },
    #[snafu(display("no help topics match '{topic}'"))]
    NoHelpTopic { topic: String },
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::MissingOperand { .. }
            | CommandError::UnknownOption { .. }
            | CommandError::InvalidPid { .. } => ErrorKind::InvalidArgument,
            CommandError::NoSuchFile { .. }
            | CommandError::NoSuchDirectory { .. }
            | CommandError::CannotAccess { .. }
            | CommandError::NoSuchProcess { .. }
            | CommandError::NoHelpTopic { .. } => ErrorKind::NotFound,
            CommandError::ProtectedProcess { .. } => ErrorKind::PermissionDenied,
            CommandError::CannotCreateDirectory { source, .. }
            | CommandError::CannotTouch { source, .. }
            | CommandError::CannotRemove { source, .. } => ErrorKind::from(source),
        }
    }
}

/// Failure of a whole command line, rendered as one error line
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DispatchError {
    #[snafu(display("{name}: command not found"))]
    CommandNotFound { name: String },
    #[snafu(display("{name}: {source}"))]
    CommandFailed { name: String, source: CommandError },
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::CommandNotFound { .. } => ErrorKind::NotFound,
            DispatchError::CommandFailed { source, .. } => source.kind(),
        }
    }
}
