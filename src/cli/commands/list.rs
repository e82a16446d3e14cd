//! List command implementation

use crate::cli::commands::{canonical_root, resolve_config, rule_file_display};
use crate::cli::SelectionArgs;
use crate::core::path::to_slash_string;
use crate::ignore::scanner::{FilteredFileScanner, ScanPhase, ScanResult};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Execute the list command
pub fn execute(
    selection: SelectionArgs,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    show_ignored: bool,
    progress: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let config = resolve_config(config_path, &selection)?;
    let root = canonical_root(&selection.root)?;
    let rule_file_name = config.rule_file_name.clone();

    let spinner = if progress && atty::is(atty::Stream::Stderr) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Some(bar)
    } else {
        None
    };

    let mut scanner = FilteredFileScanner::new(config);
    if let Some(bar) = spinner.clone() {
        scanner = scanner.with_progress(move |p| match p.phase {
            ScanPhase::Indexing => bar.set_message("Indexing rule files..."),
            ScanPhase::Filtering => bar.set_message(format!(
                "Filtering: {} files, {} ignored ({} rule files)",
                p.files_discovered, p.files_ignored, p.rule_files
            )),
            ScanPhase::Complete => bar.set_message("Done"),
        });
    }

    let result = scanner.scan(&root)?;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    if json {
        print_json(&root, &result, show_ignored, &rule_file_name)?;
        return Ok(());
    }

    if !quiet {
        eprintln!("{} {}", "Folder to archive:".bright_blue(), root.display());
    }

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create manifest {}", path.display()))?;
            result.write_manifest(BufWriter::new(file))?;
        },
        None => result.write_manifest(io::stdout().lock())?,
    }

    if show_ignored && !quiet {
        for (path, rule) in &result.ignored {
            eprintln!(
                "  {} {} ({}:{}:{})",
                "✗".red(),
                to_slash_string(path),
                rule_file_display(&rule.rule_dir, &rule_file_name),
                rule.line,
                rule.pattern
            );
        }
    }

    for entry in &result.unresolved {
        eprintln!(
            "  {} {}: {}",
            "!".yellow(),
            to_slash_string(&entry.path),
            entry.reason
        );
    }

    for rule_file in &result.unreadable_rule_files {
        eprintln!(
            "  {} rule file treated as empty: {}: {}",
            "!".yellow(),
            rule_file.path.display(),
            rule_file.reason
        );
    }

    if !quiet {
        let stats = &result.stats;
        eprintln!(
            "{} {} files selected, {} ignored ({:.1}%), {} unresolved, {} rule files",
            "✓".green().bold(),
            stats.total_included,
            stats.total_ignored,
            stats.filtering_efficiency,
            stats.total_unresolved,
            stats.rule_files
        );
        if let Some(path) = &output {
            eprintln!("  {} Manifest written to {}", "→".cyan(), path.display());
        }
    }

    Ok(())
}

fn print_json(root: &Path, result: &ScanResult, show_ignored: bool, rule_file_name: &str) -> Result<()> {
    let mut output = serde_json::json!({
        "root": root.display().to_string(),
        "rule_file_name": rule_file_name,
        "included": result.manifest_lines(),
        "unresolved": result
            .unresolved
            .iter()
            .map(|e| serde_json::json!({ "path": to_slash_string(&e.path), "reason": e.reason }))
            .collect::<Vec<_>>(),
        "unreadable_rule_files": result.unreadable_rule_files,
        "stats": result.stats,
    });

    if show_ignored {
        output["ignored"] = result
            .ignored
            .iter()
            .map(|(path, rule)| {
                serde_json::json!({
                    "path": to_slash_string(path),
                    "pattern": rule.pattern,
                    "line": rule.line,
                    "rule_file": rule_file_display(&rule.rule_dir, rule_file_name),
                })
            })
            .collect::<Vec<_>>()
            .into();
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
