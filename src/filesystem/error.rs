use snafu::Snafu;

/// Failure of a virtual filesystem operation.
///
/// The display strings are the bare reasons. Callers put the offending
/// path or name in front of them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FilesystemError {
    #[snafu(display("No such file or directory"))]
    NotFound { path: String },
    #[snafu(display("File exists"))]
    AlreadyExists { name: String },
    #[snafu(display("Is a directory"))]
    IsADirectory { name: String },
    #[snafu(display("Directory not empty"))]
    NotEmpty { name: String },
    #[snafu(display("Invalid name"))]
    InvalidName { name: String },
    #[snafu(display("Too many levels of directories"))]
    TooDeep { name: String },
    #[snafu(display("Malformed snapshot: {reason}"))]
    InvalidSnapshot { reason: String },
    #[snafu(display("Failed to encode snapshot"))]
    SnapshotEncodeError { source: serde_json::Error },
}
