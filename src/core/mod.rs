//! Core types and utilities for archignore
//!
//! Error handling and the root-relative path helpers shared by the ignore
//! engine and the CLI.

pub mod error;
pub mod path;

// Re-export commonly used items
pub use error::{ArchignoreError, Result};
pub use path::{relative_components, to_slash_string};
