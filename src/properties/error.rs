use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a bootstrap.
///
/// Queries against a finished [`PropertyStore`](super::PropertyStore) never fail;
/// everything here happens while the chains are being built.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertiesError {
    #[error("a source hierarchy must be supplied")]
    MissingHierarchy,

    #[error("properties directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("properties root is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    #[error("failed to read properties file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk properties directory '{path}': {source}")]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    #[error("failed to read settings file '{path}': {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
