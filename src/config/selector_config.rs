//! File selection configuration
//!
//! Settings are read from `~/.archignore/config.toml` when it exists, or from
//! an explicit file, and command-line flags override them.

use crate::core::error::{ArchignoreError, Result};
use clap::ValueEnum;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rule file name used when none is configured
pub const DEFAULT_RULE_FILE_NAME: &str = ".7zignore";

/// What to do when a rule file exists but cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RuleFilePolicy {
    /// Abort the scan
    #[default]
    Fail,
    /// Warn and continue as if the directory had no rule file
    TreatAsEmpty,
}

/// What to do with a path that could not be traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Leave it out of the output and report it
    #[default]
    Exclude,
    /// Emit the unresolved path itself in the output
    Include,
    /// Abort the scan
    Fail,
}

/// Configuration for one file selection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Name of the per-directory rule file
    pub rule_file_name: String,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Maximum traversal depth below the root (None = unlimited)
    pub max_depth: Option<usize>,
    /// Handling of unreadable rule files
    pub rule_file_policy: RuleFilePolicy,
    /// Handling of entries that could not be traversed
    pub unresolved_policy: UnresolvedPolicy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            rule_file_name: DEFAULT_RULE_FILE_NAME.to_string(),
            follow_links: false,
            max_depth: None,
            rule_file_policy: RuleFilePolicy::default(),
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }
}

impl SelectorConfig {
    /// Load the user configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SelectorConfig =
            toml::from_str(content).map_err(|e| ArchignoreError::ConfigurationError {
                reason: format!("Failed to parse config: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the path to the user configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(ArchignoreError::HomeDirectoryNotFound)?;

        Ok(user_dirs.home_dir().join(".archignore").join("config.toml"))
    }

    /// Set the rule file name
    pub fn with_rule_file_name(mut self, name: impl Into<String>) -> Self {
        self.rule_file_name = name.into();
        self
    }

    /// Check that the configuration describes a usable selection
    pub fn validate(&self) -> Result<()> {
        let name = self.rule_file_name.as_str();

        if name.is_empty() || name == "." || name == ".." {
            return Err(ArchignoreError::configuration(format!(
                "rule_file_name must name a file, got {:?}",
                name
            )));
        }

        if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            return Err(ArchignoreError::configuration(format!(
                "rule_file_name must not contain a path separator: {:?}",
                name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = SelectorConfig::default();

        assert_eq!(config.rule_file_name, ".7zignore");
        assert!(!config.follow_links);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.rule_file_policy, RuleFilePolicy::Fail);
        assert_eq!(config.unresolved_policy, UnresolvedPolicy::Exclude);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() -> Result<()> {
        let config = SelectorConfig::from_toml_str(
            r#"
rule_file_name = ".gitignore"
unresolved_policy = "include"
"#,
        )?;

        assert_eq!(config.rule_file_name, ".gitignore");
        assert_eq!(config.unresolved_policy, UnresolvedPolicy::Include);
        assert_eq!(config.rule_file_policy, RuleFilePolicy::Fail);

        Ok(())
    }

    #[test]
    fn test_policy_names() -> Result<()> {
        let config = SelectorConfig::from_toml_str("rule_file_policy = \"treat-as-empty\"\n")?;
        assert_eq!(config.rule_file_policy, RuleFilePolicy::TreatAsEmpty);

        assert!(SelectorConfig::from_toml_str("unresolved_policy = \"sometimes\"\n").is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_rule_file_name() {
        assert!(SelectorConfig::from_toml_str("rule_file_name = \"\"\n").is_err());
        assert!(SelectorConfig::from_toml_str("rule_file_name = \"a/b\"\n").is_err());
        assert!(SelectorConfig::default().with_rule_file_name("..").validate().is_err());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "follow_links = true\nmax_depth = 3\n")?;

        let config = SelectorConfig::load_from(&path)?;
        assert!(config.follow_links);
        assert_eq!(config.max_depth, Some(3));

        Ok(())
    }
}
