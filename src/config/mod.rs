//! Configuration management for archignore
//!
//! This module provides the selection settings, stored in
//! ~/.archignore/config.toml or passed explicitly.

pub mod selector_config;

// Re-export commonly used items
pub use selector_config::{RuleFilePolicy, SelectorConfig, UnresolvedPolicy, DEFAULT_RULE_FILE_NAME};
