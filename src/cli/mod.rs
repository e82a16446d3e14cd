//! Command-line interface for archignore

use crate::config::{RuleFilePolicy, SelectorConfig, UnresolvedPolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// archignore - select the files of a tree for archiving
#[derive(Parser)]
#[command(
    name = "archignore",
    version,
    about = "Select the files of a directory tree using cascading ignore files",
    long_about = "archignore walks a directory tree, applies gitignore-style rule files found at any level, and prints the root-relative paths an archiver should include."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, default_value = "auto", global = true)]
    pub color: String,

    /// Settings file (default: ~/.archignore/config.toml)
    #[arg(long, global = true, env = "ARCHIGNORE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that scans a tree
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Directory to scan
    pub root: PathBuf,

    /// Rule file name to look for in every directory
    #[arg(long, env = "ARCHIGNORE_ALIAS")]
    pub alias: Option<String>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum directory depth below the root
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// What to do with a rule file that cannot be read
    #[arg(long, value_enum)]
    pub on_unreadable_rule_file: Option<RuleFilePolicy>,

    /// What to do with a path that cannot be traversed
    #[arg(long, value_enum)]
    pub on_unresolved: Option<UnresolvedPolicy>,
}

impl SelectionArgs {
    /// Layer these flags over settings loaded from a file
    pub fn apply(&self, mut config: SelectorConfig) -> SelectorConfig {
        if let Some(alias) = &self.alias {
            config.rule_file_name = alias.clone();
        }
        if self.follow_links {
            config.follow_links = true;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = Some(depth);
        }
        if let Some(policy) = self.on_unreadable_rule_file {
            config.rule_file_policy = policy;
        }
        if let Some(policy) = self.on_unresolved {
            config.unresolved_policy = policy;
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files that would be archived
    List {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the manifest to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also report ignored files and the rule responsible
        #[arg(long)]
        show_ignored: bool,

        /// Show a progress spinner on the terminal
        #[arg(long)]
        progress: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain the verdict for specific paths
    Check {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Paths to check, relative to the root or absolute
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the rule files found under a tree
    Rules {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
