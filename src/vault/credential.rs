//! Azure identity credentials
//!
//! Tokens come from the Azure SDK's default credential chain: a service
//! principal configured in the environment, the host's managed identity, or
//! the developer's Azure CLI login. [`AzureCredential`] adapts it to
//! [`CredentialProvider`] for Resource Manager calls and hands the same SDK
//! credential to the Key Vault secrets client.

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::DefaultAzureCredential;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::error::{Result, VaultError};

/// A bearer token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Source of Azure AD access tokens
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Acquire a token for `scope`, e.g. `https://management.azure.com/.default`
    async fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

/// The SDK's default credential chain
#[derive(Clone)]
pub struct AzureCredential {
    inner: Arc<dyn TokenCredential>,
}

impl AzureCredential {
    /// Build the default chain from the process environment
    pub fn from_environment() -> Result<Self> {
        let inner: Arc<dyn TokenCredential> = DefaultAzureCredential::new()
            .map_err(|e| VaultError::Credential(e.to_string()))?;
        Ok(Self { inner })
    }

    /// The underlying SDK credential, for SDK clients
    pub fn token_credential(&self) -> Arc<dyn TokenCredential> {
        self.inner.clone()
    }
}

#[async_trait]
impl CredentialProvider for AzureCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let token = self
            .inner
            .get_token(&[scope])
            .await
            .map_err(|e| VaultError::Credential(e.to_string()))?;

        let expires_at = DateTime::<Utc>::from_timestamp(token.expires_on.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now);
        debug!("Acquired token for {} valid until {}", scope, expires_at);

        Ok(AccessToken {
            token: token.token.secret().to_string(),
            expires_at,
        })
    }
}

/// Identity claims read from an access token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Tenant id
    pub tid: String,
    /// Object id of the caller
    pub oid: String,
}

/// Decode base64url (URL-safe base64, padding optional)
fn decode_segment(input: &str) -> std::result::Result<Vec<u8>, String> {
    use base64::{Engine as _, engine::general_purpose};

    general_purpose::URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|e| e.to_string())
}

/// Read `tid` and `oid` from a JWT access token without verifying it
pub fn token_claims(token: &str) -> Result<TokenClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|_| token.split('.').count() == 3)
        .ok_or_else(|| VaultError::Credential("access token is not a JWT".to_string()))?;

    let bytes = decode_segment(payload)
        .map_err(|e| VaultError::Credential(format!("failed to decode token claims: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| VaultError::Credential(format!("failed to parse token claims: {}", e)).into())
}

/// Fixed token, for tests
#[cfg(test)]
pub struct StaticCredential {
    pub token: String,
    pub calls: std::sync::atomic::AtomicUsize,
    pub lifetime: chrono::Duration,
}

#[cfg(test)]
impl StaticCredential {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: std::sync::atomic::AtomicUsize::new(0),
            lifetime: chrono::Duration::hours(1),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(AccessToken {
            token: self.token.clone(),
            expires_at: Utc::now() + self.lifetime,
        })
    }
}

/// Build an unsigned JWT carrying `claims`, for tests
#[cfg(test)]
pub fn fake_jwt(claims: &serde_json::Value) -> String {
    use base64::{Engine as _, engine::general_purpose};

    let encode = |v: &[u8]| general_purpose::URL_SAFE_NO_PAD.encode(v);
    format!(
        "{}.{}.sig",
        encode(br#"{"alg":"none","typ":"JWT"}"#),
        encode(claims.to_string().as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_token_claims() {
        let jwt = fake_jwt(&serde_json::json!({"tid": "tenant-1", "oid": "object-1", "exp": 1}));
        let claims = token_claims(&jwt).unwrap();

        assert_eq!(claims.tid, "tenant-1");
        assert_eq!(claims.oid, "object-1");
    }

    #[test]
    fn test_token_claims_accepts_padded_segments() {
        let jwt = fake_jwt(&serde_json::json!({"tid": "t", "oid": "o"}));
        let mut parts: Vec<String> = jwt.split('.').map(str::to_string).collect();
        parts[1].push_str("==");

        let claims = token_claims(&parts.join(".")).unwrap();
        assert_eq!(claims.oid, "o");
    }

    #[test]
    fn test_token_claims_rejects_opaque_token() {
        let err = token_claims("not-a-jwt").unwrap_err();
        assert!(matches!(err, Error::Vault(VaultError::Credential(_))));
    }

    #[test]
    fn test_token_claims_missing_object_id() {
        let jwt = fake_jwt(&serde_json::json!({"tid": "tenant-1"}));
        let err = token_claims(&jwt).unwrap_err();
        assert!(err.to_string().contains("failed to parse token claims"));
    }

    #[tokio::test]
    async fn test_static_credential_counts_calls() {
        let credential = StaticCredential::new("t");
        let token = credential.get_token("scope/.default").await.unwrap();

        assert_eq!(token.token, "t");
        assert!(token.expires_at > Utc::now());
        assert_eq!(credential.calls(), 1);
    }
}
