//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::load_config;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "ghas-report Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match load_config(opts) {
        Ok(config) => config,
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            println!();
            println!(
                "Run {} to create a configuration file.",
                "ghas-report init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            config_path.display().to_string().cyan(),
            "(not created, using defaults)".dimmed()
        );
    }
    println!();

    match config.vault_url {
        Some(ref url) => println!("{} Key Vault: {}", "✓".green(), url),
        None => {
            println!("{} Key Vault not configured", "✗".red());
            println!("  → Run 'ghas-report init' or 'ghas-report provision'");
        }
    }

    match config.recipient {
        Some(ref recipient) => println!("{} Recipient: {}", "✓".green(), recipient),
        None => println!("{} No report recipient set", "○".dimmed()),
    }

    let orgs_path = config.organizations_path();
    match config.load_organizations() {
        Ok(list) => println!(
            "{} Organizations file: {} ({} enabled, {} disabled)",
            "✓".green(),
            orgs_path.display(),
            list.enabled().count(),
            list.disabled_count()
        ),
        Err(err) => println!("{} Organizations file: {}", "✗".red(), err),
    }

    println!("{} GitHub API: {}", "○".dimmed(), config.github.api_url.cyan());
    println!();

    Ok(())
}
