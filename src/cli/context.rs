//! Command execution context
//!
//! Loads the configuration once, resolves the Azure credential and Key Vault
//! client, and builds the authenticated GitHub client for commands that need it.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::cli::args::GlobalOptions;
use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Aggregate, Aggregator};
use crate::vault::{AzureCredential, KeyVaultClient, SecretAccessor};

/// Load the config file and apply CLI/env overrides
pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
    let mut config = Config::load_at(opts.config_ref())?;
    config.apply(&opts.overrides());
    Ok(config)
}

/// Context for commands that read secrets from the vault.
pub struct CommandContext {
    /// Loaded configuration with overrides applied
    pub config: Config,
    /// Key Vault client shared with the mailer
    pub vault: Arc<KeyVaultClient>,
}

impl CommandContext {
    /// Load configuration and connect to the configured vault.
    ///
    /// # Errors
    /// Returns an error if the config cannot be loaded, no vault URL is
    /// configured, or no Azure credential can be constructed.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = load_config(opts)?;
        let vault_url = config.require_vault_url()?.to_string();

        let credential = AzureCredential::from_environment()?;
        let vault = Arc::new(KeyVaultClient::new(vault_url, credential.token_credential())?);

        Ok(Self { config, vault })
    }

    /// Resolve the GitHub token from the vault and build the API client
    pub async fn github_client(&self) -> Result<GitHubClient> {
        let token = self
            .vault
            .get_secret(&self.config.secrets.github_token)
            .await?;
        debug!("Resolved GitHub token from {}", self.vault.vault_url());

        GitHubClient::new(token, &self.config.github)
    }

    /// Aggregate every organization in the organizations file
    pub async fn aggregate(&self) -> Result<Aggregate> {
        let organizations = self.config.load_organizations()?;
        let client = Arc::new(self.github_client().await?);
        info!(
            "Aggregating {} organizations with concurrency {}",
            organizations.enabled().count(),
            self.config.github.concurrency
        );

        let aggregator = Aggregator::new(client)
            .with_concurrency(self.config.github.concurrency)
            .with_progress(progress_bar());

        Ok(aggregator.run(&organizations.organizations).await)
    }
}

/// Progress bar for repository enrichment, drawn on stderr
fn progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

    ProgressBar::new(0).with_style(style)
}
