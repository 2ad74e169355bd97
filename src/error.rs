//! Error types for ghas-report

use std::time::Duration;
use thiserror::Error;

/// Result type alias for ghas-report operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// GitHub API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub rejected the token. Check the `github-token` secret in the vault.")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Errors from the identity provider, Key Vault and Resource Manager
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("No usable Azure credential: {0}")]
    Credential(String),

    #[error("Failed to retrieve secret {name}: {reason}")]
    SecretRetrieval { name: String, reason: String },

    #[error("Secret {0} not found in Key Vault")]
    SecretNotFound(String),

    #[error("Secret {0} is empty")]
    EmptySecret(String),

    #[error("Not authorized for Key Vault: {0}")]
    Unauthorized(String),

    #[error("Resource Manager request failed: {0}")]
    Management(String),

    #[error("Vault provisioning failed: {0}")]
    Provisioning(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VaultError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            VaultError::Network("Failed to connect".to_string())
        } else {
            VaultError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error(
        "Key Vault URL not configured. Set AZURE_KEYVAULT_URL, pass --vault-url, or run `ghas-report provision`."
    )]
    MissingVaultUrl,

    #[error("Report recipient not configured. Set GHAS_RECIPIENT or pass --recipient.")]
    MissingRecipient,

    #[error("Azure subscription not configured. Set AZURE_SUBSCRIPTION_ID or pass --subscription.")]
    MissingSubscription,

    #[error("Organizations file not found: {0}")]
    OrganizationsNotFound(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized_message() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("github-token"));
    }

    #[test]
    fn test_api_error_rate_limit() {
        let err = ApiError::RateLimit(Duration::from_secs(30));
        let msg = err.to_string();
        assert!(msg.contains("Rate limit"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_api_error_unexpected_status() {
        let err = ApiError::UnexpectedStatus(418);
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_vault_error_retrieval_wraps_cause() {
        let err = VaultError::SecretRetrieval {
            name: "github-token".to_string(),
            reason: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("github-token"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_config_error_missing_vault_url() {
        let err = ConfigError::MissingVaultUrl;
        assert!(err.to_string().contains("AZURE_KEYVAULT_URL"));
    }

    #[test]
    fn test_config_error_missing_recipient() {
        let err = ConfigError::MissingRecipient;
        assert!(err.to_string().contains("--recipient"));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::Unauthorized.into();

        match err {
            Error::Api(ApiError::Unauthorized) => (),
            _ => panic!("Expected Error::Api(ApiError::Unauthorized)"),
        }
    }

    #[test]
    fn test_error_from_vault_error() {
        let err: Error = VaultError::SecretNotFound("email-user".to_string()).into();

        match err {
            Error::Vault(VaultError::SecretNotFound(name)) => assert_eq!(name, "email-user"),
            _ => panic!("Expected Error::Vault(VaultError::SecretNotFound)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
