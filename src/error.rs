//! Error taxonomy for the rule engine.
//!
//! Validation findings are never reported through this type; they are
//! collected as data in [`crate::models::ValidationResult`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The rule tree or manifest could not be read. A missing root is not
    /// an error; callers see an empty result instead.
    #[error("Failed to read {}: {source}", path.display())]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest syntax in {}: {message}", path.display())]
    ManifestSyntax { path: PathBuf, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid scope: {0}")]
    UnknownScope(String),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Markdown lint failed: {0}")]
    Lint(String),
}

impl Error {
    pub(crate) fn store_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreRead {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
