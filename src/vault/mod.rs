//! Azure Key Vault access and provisioning

pub mod credential;
pub mod keyvault;
pub mod provision;

pub use credential::{AzureCredential, CredentialProvider};
pub use keyvault::{KeyVaultClient, SecretAccessor};
pub use provision::{ProvisionRequest, Provisioner, store_initial_secrets};
