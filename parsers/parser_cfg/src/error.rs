use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing an extraction; extraction itself never fails
#[derive(Debug, Error)]
pub enum CfgError {
    #[error("property name must not be empty")]
    EmptyProperty,
    #[error("invalid property pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
