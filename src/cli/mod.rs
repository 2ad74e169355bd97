//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod completions;
pub mod context;
pub mod init;
pub mod provision;
pub mod report;
pub mod scan;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};

/// ghas-report - GitHub Advanced Security status report across organizations
#[derive(Parser, Debug)]
#[command(name = "ghas-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "GHAS_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Azure Key Vault URL holding the GitHub token and mail credentials
    #[arg(long, global = true, env = "AZURE_KEYVAULT_URL", hide_env = true)]
    pub vault_url: Option<String>,

    /// Report recipient address
    #[arg(long, global = true, env = "GHAS_RECIPIENT", hide_env = true)]
    pub recipient: Option<String>,

    /// Organizations file (JSON or YAML)
    #[arg(long, global = true, env = "GHAS_ORGS_FILE", hide_env = true)]
    pub orgs: Option<PathBuf>,

    /// GitHub API base URL (GitHub Enterprise or testing)
    #[arg(long, global = true, env = "GHAS_GITHUB_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "GHAS_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize ghas-report configuration
    Init,

    /// Show configuration status
    Status,

    /// Build the security report and email it
    Report {
        /// Also write the HTML report to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Skip email delivery
        #[arg(long)]
        no_email: bool,
    },

    /// Check scanning status and print it to the terminal
    Scan {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create the Key Vault and store the initial secrets
    Provision(ProvisionArgs),

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   ghas-report completion bash > /etc/bash_completion.d/ghas-report
  zsh:    ghas-report completion zsh > \"${fpath[1]}/_ghas-report\"
  fish:   ghas-report completion fish > ~/.config/fish/completions/ghas-report.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Vault provisioning arguments
#[derive(Debug, Clone, Args)]
pub struct ProvisionArgs {
    /// Azure subscription ID
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID", hide_env = true)]
    pub subscription: Option<String>,

    /// Resource group to create or reuse
    #[arg(long)]
    pub resource_group: Option<String>,

    /// Key Vault name
    #[arg(long)]
    pub vault_name: Option<String>,

    /// Azure region
    #[arg(long)]
    pub location: Option<String>,
}
