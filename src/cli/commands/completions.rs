//! Shell completions command implementation.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};
use std::io::{self, Write};

/// Print completions for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn execute(shell: &Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

/// Write the completion script for the `missions` command tree.
fn render(shell: &Shell, out: &mut dyn Write) {
    match shell {
        Shell::Bash => write_script(shells::Bash, out),
        Shell::Zsh => write_script(shells::Zsh, out),
        Shell::Fish => write_script(shells::Fish, out),
        Shell::PowerShell => write_script(shells::PowerShell, out),
        Shell::Elvish => write_script(shells::Elvish, out),
    }
}

fn write_script<G: Generator>(generator: G, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(generator, &mut cmd, name, out);
}
