use std::path::PathBuf;

use bincode::{Decode, Encode};
use compio::fs;
use snafu::{ResultExt, Snafu, ensure};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::filesystem::path::validate_name;

const SNAPSHOT_EXTENSION: &str = "snapshot";
const PARTIAL_EXTENSION: &str = "snapshot.partial";

/// On-disk record of one user's session
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
struct StoredSnapshot {
    user: String,
    /// Unix timestamp in seconds
    saved_at: i64,
    data: String,
}

/// Keeps serialized filesystems on disk, one file per user.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    directory: PathBuf,
}

impl SnapshotStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn user_path(&self, user: &str, extension: &str) -> Result<PathBuf, SnapshotStoreError> {
        ensure!(
            validate_name(user).is_ok(),
            InvalidUserSnafu {
                user: user.to_string()
            }
        );
        Ok(self.directory.join(format!("{user}.{extension}")))
    }

    fn snapshot_path(&self, user: &str) -> Result<PathBuf, SnapshotStoreError> {
        self.user_path(user, SNAPSHOT_EXTENSION)
    }

    /// Stores `snapshot` as the session of `user`.
    ///
    /// The record is written next to the previous one and renamed over it,
    /// so an interrupted save leaves the last complete snapshot in place.
    pub async fn save(&self, user: &str, snapshot: &str) -> Result<(), SnapshotStoreError> {
        let path = self.snapshot_path(user)?;
        let partial_path = self.user_path(user, PARTIAL_EXTENSION)?;
        fs::create_dir_all(&self.directory)
            .await
            .context(WriteSnafu {
                path: self.directory.best_effort_path_display(),
            })?;

        let record = StoredSnapshot {
            user: user.to_string(),
            saved_at: OffsetDateTime::now_utc().unix_timestamp(),
            data: snapshot.to_string(),
        };
        let bytes = bincode::encode_to_vec(&record, bincode::config::standard())
            .context(EncodeSnafu)?;

        debug!(
            "Writing {} bytes to {}",
            bytes.len(),
            partial_path.best_effort_path_display()
        );
        fs::write(&partial_path, bytes).await.0.context(WriteSnafu {
            path: partial_path.best_effort_path_display(),
        })?;
        fs::rename(&partial_path, &path).await.context(WriteSnafu {
            path: path.best_effort_path_display(),
        })?;
        info!("Saved session of '{user}'");
        Ok(())
    }

    /// Returns the last saved snapshot of `user`, if there is one.
    pub async fn load(&self, user: &str) -> Result<Option<String>, SnapshotStoreError> {
        let path = self.snapshot_path(user)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!("No saved session for '{user}'");
                return Ok(None);
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    path: path.best_effort_path_display(),
                });
            }
        };

        let (record, _): (StoredSnapshot, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard())
                .context(DecodeSnafu {
                    path: path.best_effort_path_display(),
                })?;
        ensure!(
            record.user == user,
            ForeignSnapshotSnafu {
                path: path.best_effort_path_display(),
                owner: record.user,
            }
        );

        debug!("Loaded session of '{user}' saved at {}", record.saved_at);
        Ok(Some(record.data))
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotStoreError {
    #[snafu(display("'{user}' cannot be used as a snapshot name"))]
    InvalidUser { user: String },
    #[snafu(display("Failed to read snapshot file: {path}"))]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write snapshot file: {path}"))]
    WriteError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to encode snapshot"))]
    EncodeError { source: bincode::error::EncodeError },
    #[snafu(display("Snapshot file is corrupted: {path}"))]
    DecodeError {
        path: String,
        source: bincode::error::DecodeError,
    },
    #[snafu(display("Snapshot file {path} belongs to '{owner}'"))]
    ForeignSnapshot { path: String, owner: String },
}
