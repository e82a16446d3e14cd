use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;

/// Generate shell completion scripts
///
/// The script goes to stdout; installation hints go to stderr so the output
/// can be piped or eval'd directly.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = "archignore";

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    eprintln!("\n{}", "Installation Instructions:".bold());

    match shell {
        Shell::Bash => {
            eprintln!("  Add the following to your ~/.bashrc or ~/.bash_profile:");
            eprintln!("  {}", "eval \"$(archignore completion bash)\"".cyan());
        },
        Shell::Zsh => {
            eprintln!("  Save the script in a directory on your fpath:");
            eprintln!(
                "  {}",
                "archignore completion zsh > ~/.local/share/zsh/site-functions/_archignore".cyan()
            );
        },
        Shell::Fish => {
            eprintln!("  Save the completion script:");
            eprintln!(
                "  {}",
                "archignore completion fish > ~/.config/fish/completions/archignore.fish".cyan()
            );
        },
        Shell::PowerShell => {
            eprintln!("  Add the following to your PowerShell profile:");
            eprintln!(
                "  {}",
                "Invoke-Expression (& archignore completion powershell | Out-String)".cyan()
            );
        },
        _ => {
            eprintln!("  Please refer to your shell's documentation for installing completion scripts.");
        },
    }

    Ok(())
}
