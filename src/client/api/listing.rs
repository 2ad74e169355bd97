//! Listing API trait for collection operations

use async_trait::async_trait;

use crate::client::models::{Branch, Repository};
use crate::error::Result;

/// Collection listing operations for the GitHub API
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// List every repository of an organization, walking all pages in order
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>>;

    /// List the branches of a repository (single page)
    async fn list_branches(&self, full_name: &str) -> Result<Vec<Branch>>;
}
