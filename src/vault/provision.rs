//! Key Vault provisioning through Azure Resource Manager
//!
//! Creates (or updates) the resource group and vault, waits for the vault to
//! finish provisioning, and grants the caller full access through an access
//! policy.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use reqwest::{Client as HttpClient, Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use super::credential::{CredentialProvider, TokenClaims, token_claims};
use super::keyvault::SecretAccessor;
use crate::error::{Result, VaultError};

/// Token scope for Resource Manager
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

const RESOURCE_GROUP_API_VERSION: &str = "2021-04-01";
const VAULT_API_VERSION: &str = "2022-07-01";

const SOFT_DELETE_RETENTION_DAYS: u32 = 7;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_POLL_ATTEMPTS: u32 = 60;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where to create the vault
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub subscription_id: String,
    pub resource_group: String,
    pub vault_name: String,
    pub location: String,
}

/// Data-plane URL of a vault
pub fn vault_url(vault_name: &str) -> String {
    format!("https://{}.vault.azure.net/", vault_name)
}

#[derive(Deserialize)]
struct VaultResource {
    #[serde(default)]
    properties: VaultProperties,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VaultProperties {
    #[serde(default)]
    provisioning_state: Option<String>,
}

/// Resource Manager client for vault provisioning
pub struct Provisioner {
    http: HttpClient,
    management_url: String,
    credential: Arc<dyn CredentialProvider>,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl Provisioner {
    pub fn new(management_url: &str, credential: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(VaultError::from)?;

        Ok(Self {
            http,
            management_url: management_url.trim_end_matches('/').to_string(),
            credential,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        })
    }

    /// Override how often and how long to wait for the vault
    #[cfg(test)]
    pub fn with_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts.max(1);
        self
    }

    /// Provision the vault and return its data-plane URL
    pub async fn provision(&self, request: &ProvisionRequest) -> Result<String> {
        let access = self.credential.get_token(MANAGEMENT_SCOPE).await?;
        debug!("Management token expires at {}", access.expires_at);
        let token = access.token;
        let caller = token_claims(&token)?;
        debug!("Provisioning as object {} in tenant {}", caller.oid, caller.tid);

        self.ensure_resource_group(&token, request).await?;
        info!("Resource group {} is ready", request.resource_group);

        self.put_vault(&token, request, &caller).await?;
        self.wait_until_ready(&token, request).await?;
        info!("Key Vault {} is ready", request.vault_name);

        Ok(vault_url(&request.vault_name))
    }

    /// Management URL with percent-encoded path segments and an api-version
    fn arm_url(&self, segments: &[&str], api_version: &str) -> Result<Url> {
        let invalid = || VaultError::Management(format!("invalid management URL {}", self.management_url));
        let mut url = Url::parse(&self.management_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    fn resource_group_url(&self, request: &ProvisionRequest) -> Result<Url> {
        self.arm_url(
            &[
                "subscriptions",
                request.subscription_id.as_str(),
                "resourcegroups",
                request.resource_group.as_str(),
            ],
            RESOURCE_GROUP_API_VERSION,
        )
    }

    fn vault_resource_url(&self, request: &ProvisionRequest) -> Result<Url> {
        self.arm_url(
            &[
                "subscriptions",
                request.subscription_id.as_str(),
                "resourceGroups",
                request.resource_group.as_str(),
                "providers",
                "Microsoft.KeyVault",
                "vaults",
                request.vault_name.as_str(),
            ],
            VAULT_API_VERSION,
        )
    }

    async fn send(&self, method: Method, url: Url, token: &str, body: Option<&Value>) -> Result<Value> {
        let mut builder = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(VaultError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(VaultError::from)?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(VaultError::Management(format!("HTTP {}: {}", status.as_u16(), detail)).into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| VaultError::Management(format!("invalid response: {}", e)).into())
    }

    async fn ensure_resource_group(&self, token: &str, request: &ProvisionRequest) -> Result<()> {
        let body = json!({ "location": request.location });
        self.send(Method::PUT, self.resource_group_url(request)?, token, Some(&body))
            .await?;
        Ok(())
    }

    async fn put_vault(&self, token: &str, request: &ProvisionRequest, caller: &TokenClaims) -> Result<()> {
        let body = vault_body(request, caller);
        self.send(Method::PUT, self.vault_resource_url(request)?, token, Some(&body))
            .await?;
        Ok(())
    }

    async fn wait_until_ready(&self, token: &str, request: &ProvisionRequest) -> Result<()> {
        let url = self.vault_resource_url(request)?;

        for attempt in 1..=self.poll_attempts {
            let resource: VaultResource =
                serde_json::from_value(self.send(Method::GET, url.clone(), token, None).await?)
                    .map_err(|e| VaultError::Management(format!("invalid vault resource: {}", e)))?;

            match resource.properties.provisioning_state.as_deref() {
                Some("Succeeded") => return Ok(()),
                Some("Failed") => {
                    return Err(VaultError::Provisioning(format!(
                        "vault {} reported provisioningState Failed",
                        request.vault_name
                    ))
                    .into());
                }
                state => debug!(
                    "Vault {} is {} (attempt {}/{})",
                    request.vault_name,
                    state.unwrap_or("pending"),
                    attempt,
                    self.poll_attempts
                ),
            }

            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(VaultError::Provisioning(format!(
            "vault {} not ready after {} checks",
            request.vault_name, self.poll_attempts
        ))
        .into())
    }
}

/// Vault resource body: standard SKU, full access for the caller
fn vault_body(request: &ProvisionRequest, caller: &TokenClaims) -> Value {
    json!({
        "location": request.location,
        "properties": {
            "tenantId": caller.tid,
            "sku": { "family": "A", "name": "standard" },
            "accessPolicies": [{
                "tenantId": caller.tid,
                "objectId": caller.oid,
                "permissions": {
                    "secrets": ["all"],
                    "keys": ["all"],
                    "certificates": ["all"]
                }
            }],
            "enableRbacAuthorization": false,
            "enableSoftDelete": true,
            "softDeleteRetentionInDays": SOFT_DELETE_RETENTION_DAYS,
            "enablePurgeProtection": true
        }
    })
}

/// Store every non-empty initial secret; returns the names written
pub async fn store_initial_secrets<S>(store: &S, secrets: &[(&str, Option<String>)]) -> Result<Vec<String>>
where
    S: SecretAccessor + ?Sized,
{
    let mut written = Vec::new();
    for (name, value) in secrets {
        let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) else {
            debug!("No initial value for {}; skipping", name);
            continue;
        };
        store.set_secret(name, value).await?;
        written.push(name.to_string());
    }
    Ok(written)
}
