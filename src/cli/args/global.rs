//! Global CLI options shared across all commands

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Overrides;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; it is applied on top of the config file in
/// [`GlobalOptions::overrides`].
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Custom config file path (defaults to ~/.ghas-report/config.yaml)
    pub config: Option<String>,

    /// Key Vault URL override
    pub vault_url: Option<String>,

    /// Report recipient override
    pub recipient: Option<String>,

    /// Organizations file override
    pub orgs: Option<PathBuf>,

    /// GitHub API base URL override
    pub api_url: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            vault_url: cli.vault_url.clone(),
            recipient: cli.recipient.clone(),
            orgs: cli.orgs.clone(),
            api_url: cli.api_url.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Overrides to apply on top of the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            vault_url: self.vault_url.clone(),
            recipient: self.recipient.clone(),
            organizations_file: self.orgs.clone(),
            api_url: self.api_url.clone(),
            subscription_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_carry_flags() {
        let opts = GlobalOptions {
            config: Some("/custom/path".to_string()),
            vault_url: Some("https://kv.vault.azure.net/".to_string()),
            recipient: Some("security@example.com".to_string()),
            orgs: Some(PathBuf::from("orgs.yaml")),
            api_url: Some("http://localhost:8080".to_string()),
        };

        let overrides = opts.overrides();
        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(overrides.vault_url.as_deref(), Some("https://kv.vault.azure.net/"));
        assert_eq!(overrides.recipient.as_deref(), Some("security@example.com"));
        assert_eq!(overrides.organizations_file, Some(PathBuf::from("orgs.yaml")));
        assert_eq!(overrides.api_url.as_deref(), Some("http://localhost:8080"));
        assert!(overrides.subscription_id.is_none());
    }

    #[test]
    fn test_empty_options() {
        let opts = GlobalOptions::default();
        let overrides = opts.overrides();

        assert_eq!(opts.config_ref(), None);
        assert!(overrides.vault_url.is_none());
        assert!(overrides.organizations_file.is_none());
    }
}
