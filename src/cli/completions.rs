//! Static shell completions

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;
use crate::error::Result;

/// Binary name used in generated scripts
const BIN_NAME: &str = "ghas-report";

/// Write the completion script for `shell` to `out`
pub fn write(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Print the completion script for `shell` to stdout
pub fn run(shell: Shell) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write(shell, &mut handle);
    handle.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_completion_lists_subcommands() {
        let out = script(Shell::Bash);
        assert!(out.contains("ghas-report"));
        assert!(out.contains("report"));
        assert!(out.contains("provision"));
    }

    #[test]
    fn test_fish_completion_includes_flags() {
        let out = script(Shell::Fish);
        assert!(out.contains("vault-url"));
        assert!(out.contains("no-email"));
    }
}
