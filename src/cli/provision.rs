//! Provision command implementation

use std::sync::Arc;

use colored::Colorize;

use crate::cli::ProvisionArgs;
use crate::cli::args::GlobalOptions;
use crate::cli::context::load_config;
use crate::config::Config;
use crate::error::Result;
use crate::vault::{
    AzureCredential, KeyVaultClient, ProvisionRequest, Provisioner, store_initial_secrets,
};

/// Run the provision command
///
/// Creates the resource group and vault, stores the initial secrets found in
/// `GITHUB_TOKEN`, `EMAIL_USER` and `EMAIL_PASSWORD`, and records the vault
/// URL in the configuration file.
pub async fn run(opts: &GlobalOptions, args: &ProvisionArgs) -> Result<()> {
    let mut config = load_config(opts)?;
    if let Some(ref sub) = args.subscription {
        config.azure.subscription_id = Some(sub.clone());
    }

    let request = ProvisionRequest {
        subscription_id: config.require_subscription()?.to_string(),
        resource_group: args
            .resource_group
            .clone()
            .unwrap_or_else(|| config.azure.resource_group.clone()),
        vault_name: args
            .vault_name
            .clone()
            .unwrap_or_else(|| config.azure.vault_name.clone()),
        location: args
            .location
            .clone()
            .unwrap_or_else(|| config.azure.location.clone()),
    };

    let credential = AzureCredential::from_environment()?;

    eprintln!(
        "{} Provisioning Key Vault {} in {} ({})...",
        "→".cyan(),
        request.vault_name.bold(),
        request.resource_group,
        request.location
    );
    let vault_url = Provisioner::new(&config.azure.management_url, Arc::new(credential.clone()))?
        .provision(&request)
        .await?;
    eprintln!("{} Key Vault ready at {}", "✓".green(), vault_url);

    let vault = KeyVaultClient::new(vault_url.clone(), credential.token_credential())?;
    let initial = [
        (
            config.secrets.github_token.as_str(),
            std::env::var("GITHUB_TOKEN").ok(),
        ),
        (
            config.secrets.mail_user.as_str(),
            std::env::var("EMAIL_USER").ok(),
        ),
        (
            config.secrets.mail_password.as_str(),
            std::env::var("EMAIL_PASSWORD").ok(),
        ),
    ];
    let written = store_initial_secrets(&vault, &initial).await?;
    if written.is_empty() {
        eprintln!(
            "{} No initial secrets found in GITHUB_TOKEN, EMAIL_USER or EMAIL_PASSWORD",
            "○".dimmed()
        );
    } else {
        eprintln!("{} Stored secrets: {}", "✓".green(), written.join(", "));
    }

    config.vault_url = Some(vault_url);
    config.azure.resource_group = request.resource_group;
    config.azure.vault_name = request.vault_name;
    config.azure.location = request.location;
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    eprintln!(
        "{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    Ok(())
}
