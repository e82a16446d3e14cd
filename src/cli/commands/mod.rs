//! CLI command implementations

pub mod check;
pub mod completion;
pub mod list;
pub mod rules;

// Common utilities for commands
use crate::cli::SelectionArgs;
use crate::config::SelectorConfig;
use crate::core::error::ArchignoreError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load settings from `config_path` or the user config, then apply flags
pub fn resolve_config(config_path: Option<&Path>, selection: &SelectionArgs) -> Result<SelectorConfig> {
    let base = match config_path {
        Some(path) => SelectorConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match SelectorConfig::load() {
            Ok(config) => config,
            Err(ArchignoreError::HomeDirectoryNotFound) => SelectorConfig::default(),
            Err(e) => return Err(e.into()),
        },
    };

    let config = selection.apply(base);
    config.validate()?;
    Ok(config)
}

/// Canonicalize the root directory given on the command line
pub fn canonical_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(ArchignoreError::root_not_found(root.to_path_buf()).into());
    }

    let canonical = dunce::canonicalize(root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    if !canonical.is_dir() {
        return Err(ArchignoreError::not_a_directory(root.to_path_buf()).into());
    }

    Ok(canonical)
}

/// Display form of a rule file location, e.g. `sub/.7zignore`
pub fn rule_file_display(rule_dir: &Path, rule_file_name: &str) -> String {
    crate::core::path::to_slash_string(&rule_dir.join(rule_file_name))
}
