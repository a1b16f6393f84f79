use std::path::PathBuf;
use thiserror::Error;

use crate::flatten::FlattenError;

#[derive(Debug, Error)]
pub enum PathfigError {
    #[error("Target path cannot be empty")]
    EmptyPath,

    #[error("Unsupported target type '{kind}' at '{path}'")]
    UnsupportedTarget { path: String, kind: &'static str },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to flatten {path}: {source}")]
    Flatten { path: PathBuf, source: FlattenError },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to determine the working directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("App name is required: call .app_name() on the builder")]
    AppNameRequired,
}
