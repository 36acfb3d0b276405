use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors raised while loading or reporting a suite. Test outcomes are never
/// errors; they are carried in `TestResult`.
#[derive(Debug, Error)]
pub enum ApiTestError {
    #[error("{} is missing. apitest expects a directory with an apitest.toml file.", .0.display())]
    MissingConfig(PathBuf),

    #[error("Failed to parse {}: {}", .path.display(), .source)]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("apitest version mismatch. Configuration requires: {required}, tool version: {found}.")]
    Version { required: String, found: String },

    #[error("Invalid {flag} regex: {source}")]
    Regex {
        flag: &'static str,
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
