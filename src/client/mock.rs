//! Mock GitHub API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{ListingApi, ScanningApi};
use super::models::{Branch, Repository, ScanCheck, ScanKind};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockGitHubClient::new()
///     .with_repos("acme", vec![repo("acme", "widgets")]).await
///     .with_branches("acme/widgets", &["main"]).await;
///
/// let repos = mock.list_org_repositories("acme").await?;
/// assert_eq!(repos.len(), 1);
/// ```
#[derive(Default)]
pub struct MockGitHubClient {
    /// Repositories per organization
    repos: Arc<Mutex<HashMap<String, Vec<Repository>>>>,
    /// Branches per repository full name
    branches: Arc<Mutex<HashMap<String, Vec<Branch>>>>,
    /// Scan outcomes per (repository, kind); unset pairs are `Disabled`
    scans: Arc<Mutex<HashMap<(String, ScanKind), ScanCheck>>>,
    /// Organizations whose repository listing fails
    failing_orgs: Arc<Mutex<HashSet<String>>>,
    /// Repositories whose branch listing fails
    failing_branches: Arc<Mutex<HashSet<String>>>,
    /// (repository, kind) pairs whose scan query raises instead of being contained
    raising_scans: Arc<Mutex<HashSet<(String, ScanKind)>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Order in which API calls were made
    call_log: Arc<Mutex<Vec<String>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_org_repositories: usize,
    pub list_branches: usize,
    pub check_scan_status: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.list_org_repositories + self.list_branches + self.check_scan_status
    }
}

/// Build a repository the way the API would list it
pub fn repo(org: &str, name: &str) -> Repository {
    Repository {
        full_name: format!("{}/{}", org, name),
        name: name.to_string(),
        html_url: format!("https://github.com/{}/{}", org, name),
    }
}

impl MockGitHubClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure repositories returned for an organization.
    pub async fn with_repos(self, org: &str, repos: Vec<Repository>) -> Self {
        self.repos.lock().await.insert(org.to_string(), repos);
        self
    }

    /// Configure branches returned for a repository.
    pub async fn with_branches(self, full_name: &str, names: &[&str]) -> Self {
        let branches = names
            .iter()
            .map(|n| Branch {
                name: n.to_string(),
            })
            .collect();
        self.branches
            .lock()
            .await
            .insert(full_name.to_string(), branches);
        self
    }

    /// Configure the outcome of a scan-status query.
    pub async fn with_scan(self, full_name: &str, kind: ScanKind, check: ScanCheck) -> Self {
        self.scans
            .lock()
            .await
            .insert((full_name.to_string(), kind), check);
        self
    }

    /// Make repository listing fail for an organization.
    pub async fn failing_org(self, org: &str) -> Self {
        self.failing_orgs.lock().await.insert(org.to_string());
        self
    }

    /// Make branch listing fail for a repository.
    pub async fn failing_branches(self, full_name: &str) -> Self {
        self.failing_branches
            .lock()
            .await
            .insert(full_name.to_string());
        self
    }

    /// Make a scan-status query raise instead of returning a contained outcome.
    pub async fn raising_scan(self, full_name: &str, kind: ScanKind) -> Self {
        self.raising_scans
            .lock()
            .await
            .insert((full_name.to_string(), kind));
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get the ordered call log, e.g. `list_branches:acme/widgets`.
    pub async fn call_log(&self) -> Vec<String> {
        self.call_log.lock().await.clone()
    }

    async fn record(&self, entry: String) {
        self.call_log.lock().await.push(entry);
    }
}

#[async_trait]
impl ListingApi for MockGitHubClient {
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        self.record(format!("list_org_repositories:{}", org)).await;
        self.call_count.lock().await.list_org_repositories += 1;

        if self.failing_orgs.lock().await.contains(org) {
            return Err(ApiError::ServerError(format!("listing {} failed", org)).into());
        }

        Ok(self
            .repos
            .lock()
            .await
            .get(org)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_branches(&self, full_name: &str) -> Result<Vec<Branch>> {
        self.record(format!("list_branches:{}", full_name)).await;
        self.call_count.lock().await.list_branches += 1;

        if self.failing_branches.lock().await.contains(full_name) {
            return Err(ApiError::Network("connection reset".to_string()).into());
        }

        Ok(self
            .branches
            .lock()
            .await
            .get(full_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ScanningApi for MockGitHubClient {
    async fn check_scan_status(&self, full_name: &str, kind: ScanKind) -> Result<ScanCheck> {
        self.record(format!("check_scan_status:{}:{}", full_name, kind))
            .await;
        self.call_count.lock().await.check_scan_status += 1;

        let key = (full_name.to_string(), kind);
        if self.raising_scans.lock().await.contains(&key) {
            return Err(ApiError::Network("connection reset".to_string()).into());
        }

        Ok(self
            .scans
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or(ScanCheck::Disabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_data() {
        let mock = MockGitHubClient::new()
            .with_repos("acme", vec![repo("acme", "widgets")])
            .await
            .with_branches("acme/widgets", &["main", "dev"])
            .await
            .with_scan("acme/widgets", ScanKind::Secret, ScanCheck::Enabled { alerts: 2 })
            .await;

        let repos = mock.list_org_repositories("acme").await.unwrap();
        assert_eq!(repos, vec![repo("acme", "widgets")]);

        let branches = mock.list_branches("acme/widgets").await.unwrap();
        assert_eq!(branches.len(), 2);

        let code = mock
            .check_scan_status("acme/widgets", ScanKind::Code)
            .await
            .unwrap();
        assert_eq!(code, ScanCheck::Disabled);

        let secret = mock
            .check_scan_status("acme/widgets", ScanKind::Secret)
            .await
            .unwrap();
        assert_eq!(secret, ScanCheck::Enabled { alerts: 2 });

        assert_eq!(mock.call_counts().await.total(), 4);
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let mock = MockGitHubClient::new()
            .failing_org("acme")
            .await
            .failing_branches("globex/api")
            .await
            .raising_scan("globex/api", ScanKind::Code)
            .await;

        assert!(mock.list_org_repositories("acme").await.is_err());
        assert!(mock.list_branches("globex/api").await.is_err());
        assert!(
            mock.check_scan_status("globex/api", ScanKind::Code)
                .await
                .is_err()
        );
        assert_eq!(
            mock.call_log().await,
            vec![
                "list_org_repositories:acme",
                "list_branches:globex/api",
                "check_scan_status:globex/api:code",
            ]
        );
    }
}
