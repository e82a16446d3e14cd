//! Verdict resolution over the chain of ancestor rule sets

use crate::core::path::{join_components, relative_components};
use crate::ignore::index::DirectoryRuleIndex;
use crate::ignore::pattern::{CompiledPattern, PatternType};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The rule that decided a verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRule {
    /// Pattern text as written in the rule file
    pub pattern: String,
    /// 1-based line of the pattern in its rule file
    pub line: usize,
    /// Directory owning the rule file, relative to the scanned root
    pub rule_dir: PathBuf,
}

impl MatchedRule {
    fn new(pattern: &CompiledPattern, rule_dir: &Path) -> Self {
        Self {
            pattern: pattern.original.clone(),
            line: pattern.line,
            rule_dir: rule_dir.to_path_buf(),
        }
    }
}

/// Result of ignore checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum IgnoreResult {
    /// No pattern matched, or the last match re-included a path nothing excluded
    Included,
    /// Excluded by a pattern, possibly through an excluded ancestor directory
    Ignored(MatchedRule),
    /// Excluded earlier in the chain and re-included by a negation pattern
    IncludedByNegation(MatchedRule),
}

impl IgnoreResult {
    pub fn is_ignored(&self) -> bool {
        matches!(self, IgnoreResult::Ignored(_))
    }

    /// The rule that decided this verdict, if any
    pub fn matched_rule(&self) -> Option<&MatchedRule> {
        match self {
            IgnoreResult::Included => None,
            IgnoreResult::Ignored(rule) | IgnoreResult::IncludedByNegation(rule) => Some(rule),
        }
    }
}

/// Verdicts of directories already resolved during one scan
pub type DirectoryVerdicts = HashMap<PathBuf, IgnoreResult>;

/// Resolves include/exclude verdicts from a [`DirectoryRuleIndex`]
#[derive(Debug)]
pub struct IgnoreChecker {
    index: DirectoryRuleIndex,
}

impl IgnoreChecker {
    /// Create a checker over a fully built index
    pub fn new(index: DirectoryRuleIndex) -> Self {
        Self { index }
    }

    /// Check a root-relative path
    pub fn is_ignored(&self, relative_path: &Path, is_dir: bool) -> IgnoreResult {
        let mut cache = DirectoryVerdicts::new();
        self.is_ignored_cached(relative_path, is_dir, &mut cache)
    }

    /// Check a root-relative path, reusing and extending `cache` with the
    /// verdicts of its ancestor directories.
    ///
    /// Ancestor directories are resolved root first. The first excluded
    /// ancestor excludes the path, whatever the path's own patterns say.
    pub fn is_ignored_cached(
        &self,
        relative_path: &Path,
        is_dir: bool,
        cache: &mut DirectoryVerdicts,
    ) -> IgnoreResult {
        let components = relative_components(relative_path);
        if components.is_empty() {
            return IgnoreResult::Included;
        }

        for depth in 1..components.len() {
            let dir = join_components(&components[..depth]);
            let verdict = match cache.get(&dir) {
                Some(verdict) => verdict.clone(),
                None => {
                    let verdict = self.resolve(&components[..depth], true);
                    cache.insert(dir, verdict.clone());
                    verdict
                },
            };

            if verdict.is_ignored() {
                return verdict;
            }
        }

        self.resolve(&components, is_dir)
    }

    /// Walk the resolution chain for one path, ignoring its ancestors' own
    /// verdicts.
    ///
    /// Every directory strictly above the path may own a rule set; each one
    /// is evaluated against the path relative to that directory, root first,
    /// and the last matching pattern overall decides.
    fn resolve(&self, components: &[String], is_dir: bool) -> IgnoreResult {
        let mut result = IgnoreResult::Included;

        let parent = match components.split_last() {
            Some((_, parent)) => join_components(parent),
            None => return result,
        };

        for (owner, rule_set) in self.index.chain(&parent) {
            let relative = &components[owner.components().count()..];

            for pattern in rule_set.matching(relative, is_dir) {
                let rule = MatchedRule::new(pattern, &owner);
                result = match pattern.pattern_type {
                    PatternType::Ignore => IgnoreResult::Ignored(rule),
                    PatternType::Include => match result {
                        IgnoreResult::Ignored(_) | IgnoreResult::IncludedByNegation(_) => {
                            IgnoreResult::IncludedByNegation(rule)
                        },
                        IgnoreResult::Included => IgnoreResult::Included,
                    },
                };
            }
        }

        result
    }

    /// The index this checker resolves against
    pub fn index(&self) -> &DirectoryRuleIndex {
        &self.index
    }
}
