//! Test utilities for archignore tests

#![allow(dead_code)]

use archignore::{SelectorConfig, DEFAULT_RULE_FILE_NAME};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway directory tree with automatic cleanup
pub struct TestTree {
    pub temp_dir: TempDir,
}

impl TestTree {
    /// Create an empty tree
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root of the tree
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent directories) with some content
    pub fn file(&self, relative: &str) -> &Self {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("content of {}", relative)).unwrap();
        self
    }

    /// Create several files at once
    pub fn files(&self, relatives: &[&str]) -> &Self {
        for relative in relatives {
            self.file(relative);
        }
        self
    }

    /// Create an empty directory
    pub fn dir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.path().join(relative)).unwrap();
        self
    }

    /// Write a rule file with the default name into `dir` ("" for the root)
    pub fn rules(&self, dir: &str, lines: &[&str]) -> &Self {
        self.rules_named(dir, DEFAULT_RULE_FILE_NAME, lines)
    }

    /// Write a rule file with a custom name into `dir`
    pub fn rules_named(&self, dir: &str, name: &str, lines: &[&str]) -> &Self {
        let dir_path = self.path().join(dir);
        fs::create_dir_all(&dir_path).unwrap();
        fs::write(dir_path.join(name), lines.join("\n") + "\n").unwrap();
        self
    }

    /// Run the selection with default settings
    pub fn select(&self) -> Vec<String> {
        self.select_with(&SelectorConfig::default())
    }

    /// Run the selection with custom settings
    pub fn select_with(&self, config: &SelectorConfig) -> Vec<String> {
        archignore::select_files(self.path(), config).unwrap()
    }
}

/// Sort a list of paths for set-style comparisons
pub fn sorted(mut paths: Vec<String>) -> Vec<String> {
    paths.sort();
    paths
}

/// Turn string literals into owned strings
pub fn strings(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}
