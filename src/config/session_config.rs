use std::borrow::Cow;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = "minicore.yaml";
const DEFAULT_USER: &str = "user";
const DEFAULT_STORAGE: &str = ".minicore";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `minicore.yaml` in the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub user: String,
    /// Where saved sessions live, relative to the root
    pub storage: PathBuf,
    /// Save the session when the shell exits
    pub autosave: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            storage: PathBuf::from(DEFAULT_STORAGE),
            autosave: true,
        }
    }
}

impl SessionConfig {
    /// Reads the config file of `root`. A missing file means defaults.
    pub async fn read(root: &Path) -> Result<Self, SessionConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, SessionConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file, using defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    fn get_value<'a, 'input>(
        top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
        key: &'static str,
    ) -> Option<&'a Yaml<'input>> {
        top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
    }

    fn get_string(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<String>, SessionConfigError> {
        Self::get_value(top_level, key)
            .map(|value| {
                value.as_str().map(str::to_string).context(InvalidValueSnafu {
                    key,
                    expected: "a string",
                })
            })
            .transpose()
    }

    fn get_bool(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<bool>, SessionConfigError> {
        Self::get_value(top_level, key)
            .map(|value| match value {
                Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
                _ => InvalidValueSnafu {
                    key,
                    expected: "a boolean",
                }
                .fail(),
            })
            .transpose()
    }
}

impl TryFrom<&str> for SessionConfig {
    type Error = SessionConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents)
            .map_err(|e| SessionConfigError::ParseError { source: e })?;
        let Some(contents) = contents_vec.first() else {
            return Ok(Self::default());
        };

        let top_level = contents
            .as_mapping()
            .ok_or(SessionConfigError::TopLevelNotMap)?;

        let defaults = Self::default();
        Ok(Self {
            user: Self::get_string(top_level, "user")?.unwrap_or(defaults.user),
            storage: Self::get_string(top_level, "storage")?
                .map(PathBuf::from)
                .unwrap_or(defaults.storage),
            autosave: Self::get_bool(top_level, "autosave")?.unwrap_or(defaults.autosave),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum SessionConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}
