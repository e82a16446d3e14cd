//! archignore - select the files of a directory tree for archiving
//!
//! Rule files (`.7zignore` by default) may appear in any directory of the
//! tree. Each one holds gitignore-style patterns that apply to its own
//! subtree; rule files closer to a file override broader ones, and `!`
//! patterns re-include paths excluded earlier. The result of a scan is the
//! ordered list of root-relative paths that an external archiver should
//! receive, typically through a manifest file.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use archignore::{select_files, SelectorConfig};
//! use std::path::Path;
//!
//! let config = SelectorConfig::default().with_rule_file_name(".gitignore");
//! for path in select_files(Path::new("./my-project"), &config)? {
//!     println!("{}", path);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;

// Re-export commonly used types
pub use crate::core::error::{ArchignoreError, Result};

pub use config::{RuleFilePolicy, SelectorConfig, UnresolvedPolicy, DEFAULT_RULE_FILE_NAME};

pub use ignore::{
    checker::{IgnoreChecker, IgnoreResult, MatchedRule},
    index::DirectoryRuleIndex,
    parser::RuleSet,
    pattern::CompiledPattern,
    scanner::{select_files, FilteredFileScanner, ScanResult},
};

/// Current version of archignore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
