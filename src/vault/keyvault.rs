//! Azure Key Vault secrets client

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_security_keyvault_secrets::SecretClient;
use azure_security_keyvault_secrets::models::SecretSetParameters;
use log::debug;

use crate::error::{Result, VaultError};

/// Read and write named secrets
#[async_trait]
pub trait SecretAccessor: Send + Sync {
    /// Fetch the current value of secret `name`; empty values are errors
    async fn get_secret(&self, name: &str) -> Result<String>;

    /// Create or update secret `name`
    async fn set_secret(&self, name: &str, value: &str) -> Result<()>;
}

/// Key Vault client over the SDK secrets client
///
/// Bearer tokens are acquired and cached by the SDK pipeline.
pub struct KeyVaultClient {
    client: SecretClient,
    vault_url: String,
}

impl KeyVaultClient {
    pub fn new(vault_url: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let vault_url = vault_url.into();
        let client = SecretClient::new(&vault_url, credential, None)
            .map_err(|e| VaultError::Credential(format!("invalid vault URL {}: {}", vault_url, e)))?;

        Ok(Self {
            client,
            vault_url: vault_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }
}

/// Map an SDK failure for secret `name` by its HTTP status
fn secret_error(name: &str, status: Option<u16>, detail: String) -> VaultError {
    match status {
        Some(404) => VaultError::SecretNotFound(name.to_string()),
        Some(401) | Some(403) => VaultError::Unauthorized(detail),
        Some(code) => VaultError::SecretRetrieval {
            name: name.to_string(),
            reason: format!("HTTP {}: {}", code, detail),
        },
        None => VaultError::SecretRetrieval {
            name: name.to_string(),
            reason: detail,
        },
    }
}

fn sdk_error(name: &str, err: azure_core::Error) -> VaultError {
    secret_error(name, err.http_status().map(u16::from), err.to_string())
}

/// A secret value, rejecting missing and empty ones
fn non_empty(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(VaultError::EmptySecret(name.to_string()).into()),
    }
}

#[async_trait]
impl SecretAccessor for KeyVaultClient {
    async fn get_secret(&self, name: &str) -> Result<String> {
        debug!("Fetching secret {} from {}", name, self.vault_url);

        let secret = self
            .client
            .get_secret(name, "", None)
            .await
            .map_err(|e| sdk_error(name, e))?
            .into_body()
            .await
            .map_err(|e| sdk_error(name, e))?;

        non_empty(name, secret.value)
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<()> {
        debug!("Storing secret {} in {}", name, self.vault_url);

        let parameters = SecretSetParameters {
            value: Some(value.to_string()),
            ..Default::default()
        };
        self.client
            .set_secret(name, parameters.try_into().map_err(|e| sdk_error(name, e))?, None)
            .await
            .map_err(|e| sdk_error(name, e))?;

        Ok(())
    }
}
