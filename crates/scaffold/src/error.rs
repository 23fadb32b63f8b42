use std::path::PathBuf;
use thiserror::Error;

/// Scaffolding error
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Directory {0} already exists")]
    DirectoryExists(PathBuf),
    #[error("Invalid project name {0:?}")]
    InvalidProjectName(String),
    #[error("Template file {0} is not UTF-8")]
    NonUtf8Template(PathBuf),
    #[error("Unknown key: {0} (available: network, template)")]
    UnknownKey(String),
    #[error("Invalid {key} {value:?}, expected one of: {expected}")]
    InvalidValue { key: &'static str, value: String, expected: String },
    #[error("No home directory")]
    NoHomeDirectory,
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
