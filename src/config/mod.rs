//! Configuration management for ghas-report
//!
//! Configuration is read once at startup from a YAML file and then overlaid with
//! CLI/environment overrides. Nothing re-reads it afterwards.

mod organizations;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub use organizations::{OrganizationConfig, OrganizationList};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Azure Key Vault URL holding the GitHub token and mail credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_url: Option<String>,

    /// Address that receives the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    /// Organizations file; relative paths resolve against the config file
    #[serde(default = "default_organizations_file")]
    pub organizations_file: PathBuf,

    #[serde(default)]
    pub github: GitHubSettings,

    #[serde(default)]
    pub mail: MailSettings,

    #[serde(default)]
    pub secrets: SecretNames,

    #[serde(default)]
    pub azure: AzureSettings,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// GitHub API client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// API base URL (override for GitHub Enterprise or testing)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Items per page for paginated listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Repositories enriched concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Client-side request pacing
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// SMTP delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_subject")]
    pub subject: String,
}

/// Names of the secrets stored in Key Vault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretNames {
    #[serde(default = "default_github_token_secret")]
    pub github_token: String,

    #[serde(default = "default_mail_user_secret")]
    pub mail_user: String,

    #[serde(default = "default_mail_password_secret")]
    pub mail_password: String,
}

impl SecretNames {
    /// Key Vault secret names are 1-127 ASCII letters, digits and dashes
    pub fn validate(&self) -> Result<()> {
        for name in [&self.github_token, &self.mail_user, &self.mail_password] {
            let valid = !name.is_empty()
                && name.len() <= 127
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            if !valid {
                return Err(ConfigError::Invalid(format!("invalid Key Vault secret name {:?}", name)).into());
            }
        }
        Ok(())
    }
}

/// Azure provisioning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    #[serde(default = "default_resource_group")]
    pub resource_group: String,

    #[serde(default = "default_vault_name")]
    pub vault_name: String,

    #[serde(default = "default_location")]
    pub location: String,

    /// Resource Manager endpoint
    #[serde(default = "default_management_url")]
    pub management_url: String,
}

fn default_organizations_file() -> PathBuf {
    PathBuf::from("organizations.json")
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_concurrency() -> usize {
    4
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "GitHub Repositories and Branches Report".to_string()
}

fn default_github_token_secret() -> String {
    "github-token".to_string()
}

fn default_mail_user_secret() -> String {
    "email-user".to_string()
}

fn default_mail_password_secret() -> String {
    "email-password".to_string()
}

fn default_resource_group() -> String {
    "github-security-rg".to_string()
}

fn default_vault_name() -> String {
    "github-security-kv".to_string()
}

fn default_location() -> String {
    "eastus".to_string()
}

fn default_management_url() -> String {
    "https://management.azure.com".to_string()
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            concurrency: default_concurrency(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            subject: default_subject(),
        }
    }
}

impl Default for SecretNames {
    fn default() -> Self {
        Self {
            github_token: default_github_token_secret(),
            mail_user: default_mail_user_secret(),
            mail_password: default_mail_password_secret(),
        }
    }
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            subscription_id: None,
            resource_group: default_resource_group(),
            vault_name: default_vault_name(),
            location: default_location(),
            management_url: default_management_url(),
        }
    }
}

/// Runtime overrides from CLI flags and environment variables.
///
/// These take precedence over values from the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub vault_url: Option<String>,
    pub recipient: Option<String>,
    pub organizations_file: Option<PathBuf>,
    pub api_url: Option<String>,
    pub subscription_id: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".ghas-report").join("config.yaml"))
    }

    /// Resolve the config path, preferring an explicit path over the default
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an explicit path or the default location.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let resolved = Self::resolve_path(path)?;
        if !resolved.exists() {
            if path.is_some() {
                return Err(ConfigError::NotFound(resolved.display().to_string()).into());
            }
            let mut config = Self::default();
            config.base_dir = resolved.parent().map(Path::to_path_buf);
            return Ok(config);
        }

        Self::load_from(resolved)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let mut config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.secrets.validate()?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        Ok(config)
    }

    /// Save configuration to an explicit path or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Holds the vault URL and recipient; keep it private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Apply CLI/environment overrides on top of file values
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(ref url) = overrides.vault_url {
            self.vault_url = Some(url.clone());
        }
        if let Some(ref recipient) = overrides.recipient {
            self.recipient = Some(recipient.clone());
        }
        if let Some(ref file) = overrides.organizations_file {
            self.organizations_file = file.clone();
        }
        if let Some(ref api_url) = overrides.api_url {
            self.github.api_url = api_url.clone();
        }
        if let Some(ref sub) = overrides.subscription_id {
            self.azure.subscription_id = Some(sub.clone());
        }
    }

    /// Organizations file path with relative paths resolved against the config directory
    pub fn organizations_path(&self) -> PathBuf {
        if self.organizations_file.is_absolute() {
            return self.organizations_file.clone();
        }
        match self.base_dir {
            Some(ref dir) => dir.join(&self.organizations_file),
            None => self.organizations_file.clone(),
        }
    }

    /// Load the organizations list referenced by this config
    pub fn load_organizations(&self) -> Result<OrganizationList> {
        OrganizationList::load(&self.organizations_path())
    }

    /// Vault URL, or an error when it is not configured
    pub fn require_vault_url(&self) -> Result<&str> {
        self.vault_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVaultUrl.into())
    }

    /// Report recipient, or an error when it is not configured
    pub fn require_recipient(&self) -> Result<&str> {
        self.recipient
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRecipient.into())
    }

    /// Subscription ID, or an error when it is not configured
    pub fn require_subscription(&self) -> Result<&str> {
        self.azure
            .subscription_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingSubscription.into())
    }
}
