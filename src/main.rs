//! archignore CLI
//!
//! Command-line interface for selecting the files of a tree to archive.

use anyhow::Result;
use archignore::cli::{commands, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging on stderr; stdout carries the manifest
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.color.as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => {},
    }

    let config_path = cli.config.as_deref();

    // Execute the command
    match cli.command {
        Commands::List {
            selection,
            output,
            show_ignored,
            progress,
            json,
        } => commands::list::execute(selection, config_path, output, show_ignored, progress, json, cli.quiet),
        Commands::Check {
            selection,
            paths,
            json,
        } => commands::check::execute(selection, config_path, paths, json),
        Commands::Rules { selection, json } => commands::rules::execute(selection, config_path, json),
        Commands::Completion { shell } => commands::completion::execute(shell),
    }
}
