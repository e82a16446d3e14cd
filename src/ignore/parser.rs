//! Rule file loading: one rule file becomes one [`RuleSet`]

use crate::core::error::{ArchignoreError, Result};
use crate::ignore::pattern::CompiledPattern;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// The ordered patterns of one rule file
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// All compiled patterns, in declaration order
    patterns: Vec<CompiledPattern>,
}

impl RuleSet {
    /// Create a rule set from a rule file on disk
    pub fn from_file(rule_file: &Path) -> Result<Self> {
        let bytes = match fs::read(rule_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(e.into()),
            Err(e) => {
                return Err(ArchignoreError::rule_file_unreadable(
                    rule_file.to_path_buf(),
                    e.to_string(),
                ))
            },
        };

        let content = String::from_utf8(bytes).map_err(|e| {
            ArchignoreError::rule_file_unreadable(rule_file.to_path_buf(), format!("not valid UTF-8: {}", e))
        })?;

        let rule_set = Self::from_content(&content);
        debug!(
            "Loaded {} patterns from {}",
            rule_set.patterns.len(),
            rule_file.display()
        );
        Ok(rule_set)
    }

    /// Create a rule set from rule file content
    pub fn from_content(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let patterns = content
            .lines()
            .enumerate()
            .filter_map(|(index, line)| CompiledPattern::parse(line).map(|p| p.with_line(index + 1)))
            .collect();

        Self { patterns }
    }

    /// Patterns matching a path relative to the rule file's directory, in
    /// declaration order. The last one decides.
    pub fn matching<'a, S: AsRef<str> + 'a>(
        &'a self,
        components: &'a [S],
        is_dir: bool,
    ) -> impl Iterator<Item = &'a CompiledPattern> + 'a {
        self.patterns
            .iter()
            .filter(move |pattern| pattern.matches_components(components, is_dir))
    }

    /// Get all patterns
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}
