//! Error types for cmakescan

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cmakescan operations
#[derive(Error, Debug)]
pub enum CmakeScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Invalid metadata file {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Malformed paragraph at line {line}: {reason}")]
    Paragraph { line: usize, reason: String },

    #[error("Missing required field in metadata file: {0}")]
    MissingField(String),

    #[error("Failed to extract archive: {0}")]
    Extraction(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Temporary directory error: {0}")]
    TempDir(String),

    #[error("Failed opening output '{path}': {reason}")]
    Output { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for cmakescan operations
pub type Result<T> = std::result::Result<T, CmakeScanError>;

impl CmakeScanError {
    /// Create a metadata error for the given file
    pub fn metadata(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a paragraph syntax error at a 1-based line
    pub fn paragraph(line: usize, reason: impl Into<String>) -> Self {
        Self::Paragraph {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new extraction error
    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an output destination error
    pub fn output(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Output {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// Only failures of the shared temporary root and of the output
    /// destination are fatal. Anything raised while processing a single
    /// archive is recoverable and the archive is skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TempDir(_) | Self::Output { .. })
    }
}
