//! Error types for the rewrite engine.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rewriting operations.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No import or package declaration to anchor '{import}'")]
    NoInsertionPoint { import: String },

    #[error("Would leave '{import}' imported twice")]
    DuplicateImport { import: String },

    #[error("Cannot enumerate {path}: {message}")]
    Enumeration { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RewriteError {
    /// Returns true if the error only affects a single file and the batch may
    /// continue with the next one.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RewriteError::Io(_)
                | RewriteError::Read { .. }
                | RewriteError::Write { .. }
                | RewriteError::NoInsertionPoint { .. }
                | RewriteError::DuplicateImport { .. }
        )
    }
}

/// A specialized Result type for rewriting operations.
pub type Result<T> = std::result::Result<T, RewriteError>;
