//! Rules command implementation

use crate::cli::commands::{canonical_root, resolve_config, rule_file_display};
use crate::cli::SelectionArgs;
use crate::ignore::pattern::CompiledPattern;
use crate::ignore::scanner::FilteredFileScanner;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Execute the rules command
pub fn execute(selection: SelectionArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = resolve_config(config_path, &selection)?;
    let root = canonical_root(&selection.root)?;
    let rule_file_name = config.rule_file_name.clone();

    let index = FilteredFileScanner::new(config).build_index(&root)?;

    if json {
        let rule_files: Vec<_> = index
            .entries()
            .into_iter()
            .map(|(dir, rule_set)| {
                serde_json::json!({
                    "rule_file": rule_file_display(dir, &rule_file_name),
                    "patterns": rule_set
                        .patterns()
                        .iter()
                        .map(|p| serde_json::json!({
                            "line": p.line,
                            "pattern": p.original,
                            "type": p.pattern_type,
                            "anchored": p.anchored,
                            "directory_only": p.directory_only,
                        }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let output = serde_json::json!({
            "root": index.root().display().to_string(),
            "rule_files": rule_files,
            "unreadable": index.unreadable(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !index.has_rule_files() {
        println!("No {} files under {}", rule_file_name, index.root().display());
    }

    for (dir, rule_set) in index.entries() {
        println!(
            "{} ({} patterns)",
            rule_file_display(dir, &rule_file_name).bold(),
            rule_set.patterns().len()
        );
        for pattern in rule_set.patterns() {
            println!("  {:>4}  {}{}", pattern.line, pattern.original, describe_flags(pattern).dimmed());
        }
    }

    for rule_file in index.unreadable() {
        println!(
            "{} {} (unreadable: {})",
            "!".yellow(),
            rule_file.path.display(),
            rule_file.reason
        );
    }

    let (files, patterns) = index.stats();
    println!("\n{} rule files, {} patterns", files, patterns);

    Ok(())
}

fn describe_flags(pattern: &CompiledPattern) -> String {
    let mut flags = Vec::new();
    if pattern.is_negated() {
        flags.push("negated");
    }
    if pattern.anchored {
        flags.push("anchored");
    }
    if pattern.directory_only {
        flags.push("directory");
    }

    if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags.join(", "))
    }
}
