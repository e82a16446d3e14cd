//! Error types for archignore

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archignore operations
#[derive(Error, Debug)]
pub enum ArchignoreError {
    /// Root-related errors
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Rule file could not be read (permissions, encoding)
    #[error("Failed to read rule file {path}: {reason}")]
    RuleFileUnreadable { path: PathBuf, reason: String },

    /// A directory entry could not be traversed
    #[error("Failed to traverse {path}: {reason}")]
    TraversalFailed { path: PathBuf, reason: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Generic error for unexpected conditions
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ArchignoreError {
    /// Create a new root not found error
    pub fn root_not_found(path: PathBuf) -> Self {
        Self::RootNotFound { path }
    }

    /// Create a new not a directory error
    pub fn not_a_directory(path: PathBuf) -> Self {
        Self::NotADirectory { path }
    }

    /// Create a new rule file unreadable error
    pub fn rule_file_unreadable(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::RuleFileUnreadable {
            path,
            reason: reason.into(),
        }
    }

    /// Create a new traversal failed error
    pub fn traversal_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::TraversalFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias for archignore operations
pub type Result<T> = std::result::Result<T, ArchignoreError>;
