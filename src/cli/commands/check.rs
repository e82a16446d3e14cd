//! Check command implementation

use crate::cli::commands::{canonical_root, resolve_config, rule_file_display};
use crate::cli::SelectionArgs;
use crate::core::path::{normalize_lexically, to_slash_string};
use crate::ignore::checker::{IgnoreChecker, IgnoreResult};
use crate::ignore::scanner::FilteredFileScanner;
use anyhow::{anyhow, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Execute the check command
pub fn execute(selection: SelectionArgs, config_path: Option<&Path>, paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let config = resolve_config(config_path, &selection)?;
    let root = canonical_root(&selection.root)?;
    let rule_file_name = config.rule_file_name.clone();

    let index = FilteredFileScanner::new(config).build_index(&root)?;
    let checker = IgnoreChecker::new(index);

    let mut reports = Vec::new();
    for path in &paths {
        let relative = relative_to_root(&root, path)?;
        let is_dir = root.join(&relative).is_dir();
        let result = checker.is_ignored(&relative, is_dir);
        reports.push((relative, result));
    }

    if json {
        let output: Vec<_> = reports
            .iter()
            .map(|(path, result)| {
                serde_json::json!({
                    "path": to_slash_string(path),
                    "result": result,
                    "rule_file": result
                        .matched_rule()
                        .map(|rule| rule_file_display(&rule.rule_dir, &rule_file_name)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (path, result) in &reports {
        let status = match result {
            IgnoreResult::Ignored(_) => "ignored ".red(),
            IgnoreResult::Included | IgnoreResult::IncludedByNegation(_) => "included".green(),
        };

        match result.matched_rule() {
            Some(rule) => println!(
                "{} {}  {}",
                status,
                to_slash_string(path),
                format!(
                    "{}:{}:{}",
                    rule_file_display(&rule.rule_dir, &rule_file_name),
                    rule.line,
                    rule.pattern
                )
                .dimmed()
            ),
            None => println!("{} {}", status, to_slash_string(path)),
        }
    }

    Ok(())
}

/// Interpret a command-line path relative to the scanned root.
///
/// `..` is resolved lexically so a link is judged by its own name; an
/// absolute path that only reaches the root through links is canonicalized.
fn relative_to_root(root: &Path, path: &Path) -> Result<PathBuf> {
    let joined = normalize_lexically(&root.join(path));

    let relative = match joined.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => {
            let canonical = if path.is_absolute() {
                dunce::canonicalize(path).ok()
            } else {
                None
            };
            match canonical.as_deref().map(|c| c.strip_prefix(root)) {
                Some(Ok(relative)) => relative.to_path_buf(),
                _ => return Err(anyhow!("{} is outside {}", path.display(), root.display())),
            }
        },
    };

    if relative.as_os_str().is_empty() {
        return Err(anyhow!("{} names the root itself, not a path inside it", path.display()));
    }

    Ok(relative)
}
