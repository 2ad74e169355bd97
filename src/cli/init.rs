//! Init command implementation

use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::context::load_config;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the vault URL, recipient and organizations file, seeding each
/// prompt with the current value, then saves the configuration.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to ghas-report!".bold().green());
    println!("Let's set up your report configuration.\n");

    let mut config = load_config(opts)?;
    let theme = ColorfulTheme::default();

    let vault_url: String = Input::with_theme(&theme)
        .with_prompt("Azure Key Vault URL")
        .with_initial_text(config.vault_url.clone().unwrap_or_default())
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.starts_with("https://") {
                Ok(())
            } else {
                Err("Vault URL must start with https://")
            }
        })
        .interact_text()?;

    let recipient: String = Input::with_theme(&theme)
        .with_prompt("Report recipient email")
        .with_initial_text(config.recipient.clone().unwrap_or_default())
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.contains('@') {
                Ok(())
            } else {
                Err("Enter an email address")
            }
        })
        .interact_text()?;

    let organizations_file: String = Input::with_theme(&theme)
        .with_prompt("Organizations file")
        .default(config.organizations_file.display().to_string())
        .interact_text()?;

    config.vault_url = Some(vault_url.trim().to_string());
    config.recipient = Some(recipient.trim().to_string());
    config.organizations_file = PathBuf::from(organizations_file.trim());

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    if !config.organizations_path().exists() {
        println!(
            "{} Organizations file {} does not exist yet",
            "⚠".yellow(),
            config.organizations_path().display()
        );
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "ghas-report status".cyan());
    println!("  {} - Check scanning status", "ghas-report scan".cyan());
    println!("  {} - Build and send the report", "ghas-report report".cyan());

    Ok(())
}
