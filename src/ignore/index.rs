//! Directory rule index
//!
//! One full walk of the tree locates every rule file and compiles it. The
//! index maps each root-relative directory to its own [`RuleSet`]; rule sets
//! are not merged with their ancestors here. Directories without a rule file
//! have no entry.

use crate::config::{RuleFilePolicy, SelectorConfig};
use crate::core::error::{ArchignoreError, Result};
use crate::ignore::parser::RuleSet;
use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A rule file that exists but could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreadableRuleFile {
    /// Path of the rule file
    pub path: PathBuf,
    /// Why it could not be read
    pub reason: String,
}

/// Mapping from root-relative directory to the rule set it declares
#[derive(Debug, Clone)]
pub struct DirectoryRuleIndex {
    /// Root of the indexed tree
    root: PathBuf,
    /// Rule sets keyed by directory relative to `root` (empty path = root)
    rule_sets: HashMap<PathBuf, RuleSet>,
    /// Rule files skipped under [`RuleFilePolicy::TreatAsEmpty`]
    unreadable: Vec<UnreadableRuleFile>,
}

impl DirectoryRuleIndex {
    /// Scan `root` once and load every rule file found
    pub fn build(root: &Path, config: &SelectorConfig) -> Result<Self> {
        config.validate()?;

        let mut index = Self {
            root: root.to_path_buf(),
            rule_sets: HashMap::new(),
            unreadable: Vec::new(),
        };

        let rule_file_name = OsStr::new(&config.rule_file_name);
        let mut walker = WalkDir::new(root)
            .follow_links(config.follow_links)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));

        if let Some(depth) = config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Reported per entry by the filtering walk
                    debug!("Skipping entry while indexing rule files: {}", e);
                    continue;
                },
            };

            if entry.file_name() != rule_file_name {
                continue;
            }
            // A linked rule file counts when its target is a file
            let file_type = entry.file_type();
            if !(file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())) {
                continue;
            }

            let dir = match entry.path().parent() {
                Some(dir) => dir,
                None => continue,
            };
            let relative_dir = dir
                .strip_prefix(root)
                .map_err(|_| ArchignoreError::internal(format!("{} is outside {}", dir.display(), root.display())))?
                .to_path_buf();

            match RuleSet::from_file(entry.path()) {
                Ok(rule_set) => {
                    index.rule_sets.insert(relative_dir, rule_set);
                },
                Err(ArchignoreError::RuleFileUnreadable { path, reason })
                    if config.rule_file_policy == RuleFilePolicy::TreatAsEmpty =>
                {
                    warn!("Treating unreadable rule file {} as empty: {}", path.display(), reason);
                    index.unreadable.push(UnreadableRuleFile { path, reason });
                },
                Err(e) => return Err(e),
            }
        }

        let (files, patterns) = index.stats();
        debug!(
            "Indexed {} rule files ({} patterns) under {}",
            files,
            patterns,
            root.display()
        );

        Ok(index)
    }

    /// Build an index from rule sets already in memory.
    ///
    /// Keys are directories relative to `root`.
    pub fn from_rule_sets<I>(root: &Path, rule_sets: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, RuleSet)>,
    {
        Self {
            root: root.to_path_buf(),
            rule_sets: rule_sets.into_iter().collect(),
            unreadable: Vec::new(),
        }
    }

    /// Rule set declared directly in `relative_dir`, if any
    pub fn get(&self, relative_dir: &Path) -> Option<&RuleSet> {
        self.rule_sets.get(relative_dir)
    }

    /// Rule sets that govern paths inside `relative_dir`, root first.
    ///
    /// Directories without a rule file are skipped.
    pub fn chain(&self, relative_dir: &Path) -> Vec<(PathBuf, &RuleSet)> {
        let mut current = PathBuf::new();
        let mut chain = Vec::new();

        if let Some(rule_set) = self.get(&current) {
            chain.push((current.clone(), rule_set));
        }

        for component in relative_dir.components() {
            current.push(component);
            if let Some(rule_set) = self.get(&current) {
                chain.push((current.clone(), rule_set));
            }
        }

        chain
    }

    /// All indexed directories with their rule sets, sorted by path
    pub fn entries(&self) -> Vec<(&Path, &RuleSet)> {
        let mut entries: Vec<(&Path, &RuleSet)> = self
            .rule_sets
            .iter()
            .map(|(dir, rule_set)| (dir.as_path(), rule_set))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Rule files that were skipped because they could not be read
    pub fn unreadable(&self) -> &[UnreadableRuleFile] {
        &self.unreadable
    }

    /// Root of the indexed tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of rule files and total patterns
    pub fn stats(&self) -> (usize, usize) {
        let total_patterns = self.rule_sets.values().map(|r| r.patterns().len()).sum();
        (self.rule_sets.len(), total_patterns)
    }

    /// Check if any rule files were found
    pub fn has_rule_files(&self) -> bool {
        !self.rule_sets.is_empty()
    }
}
