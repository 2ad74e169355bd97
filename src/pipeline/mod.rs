//! Multi-organization security-status aggregation
//!
//! Walks the enabled organizations in configured order, lists their
//! repositories, and enriches every repository with its branches and both
//! scanning statuses. Failures are contained as close to their source as
//! possible:
//!
//! - a scan-status endpoint failure becomes [`ScanCheck::Failed`] inside the client
//! - any error while enriching one repository becomes [`Enrichment::Failed`]
//! - an organization whose listing fails is recorded in
//!   [`Aggregate::failed_organizations`] and the run moves on

use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::Serialize;

use crate::client::{GitHubApi, Repository, ScanCheck, ScanKind, ScanStatus, map_ordered};
use crate::config::OrganizationConfig;
use crate::error::Result;

/// Branch cell text when enrichment failed
pub const BRANCHES_PLACEHOLDER: &str = "Error fetching branches";

/// Status text when enrichment failed
pub const STATUS_PLACEHOLDER: &str = "Error checking status";

/// Branch and scanning data attached to a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Enrichment {
    Complete {
        branches: Vec<String>,
        code: ScanCheck,
        secret: ScanCheck,
    },
    /// Placeholder substituted when any enrichment call raised
    Failed { reason: String },
}

/// A repository together with its enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    #[serde(flatten)]
    pub repository: Repository,
    pub enrichment: Enrichment,
}

impl RepositoryReport {
    /// Comma-joined branch names, or the placeholder
    pub fn branch_list(&self) -> String {
        match &self.enrichment {
            Enrichment::Complete { branches, .. } => branches.join(", "),
            Enrichment::Failed { .. } => BRANCHES_PLACEHOLDER.to_string(),
        }
    }

    /// Scanning status for `kind`; `None` when the placeholder was substituted
    pub fn status(&self, kind: ScanKind) -> Option<ScanStatus> {
        match &self.enrichment {
            Enrichment::Complete { code, secret, .. } => Some(match kind {
                ScanKind::Code => code.status(kind),
                ScanKind::Secret => secret.status(kind),
            }),
            Enrichment::Failed { .. } => None,
        }
    }

    /// Status text as shown in reports
    pub fn status_text(&self, kind: ScanKind) -> String {
        self.status(kind)
            .map(|s| s.display_text())
            .unwrap_or_else(|| STATUS_PLACEHOLDER.to_string())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.enrichment, Enrichment::Failed { .. })
    }
}

/// An organization whose repository listing failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationFailure {
    pub organization: String,
    pub reason: String,
}

/// Result of a full aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Organization order, then pagination order
    pub repositories: Vec<RepositoryReport>,
    pub failed_organizations: Vec<OrganizationFailure>,
}

/// Aggregation pipeline over a GitHub API implementation
pub struct Aggregator<C> {
    client: Arc<C>,
    concurrency: usize,
    progress: ProgressBar,
}

impl<C: GitHubApi> Aggregator<C> {
    /// Create a sequential aggregator with no visible progress
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            concurrency: 1,
            progress: ProgressBar::hidden(),
        }
    }

    /// Enrich up to `concurrency` repositories at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Report enrichment progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Aggregate every enabled organization, in order.
    pub async fn run<'o, I>(&self, organizations: I) -> Aggregate
    where
        I: IntoIterator<Item = &'o OrganizationConfig>,
    {
        let mut aggregate = Aggregate::default();

        for org in organizations {
            if !org.enabled {
                debug!("Skipping disabled organization {}", org.name);
                continue;
            }

            self.progress
                .set_message(format!("Fetching repositories for {}", org.name));
            let repos = match self.client.list_org_repositories(&org.name).await {
                Ok(repos) => repos,
                Err(err) => {
                    warn!("Failed to list repositories for {}: {}", org.name, err);
                    aggregate.failed_organizations.push(OrganizationFailure {
                        organization: org.name.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            info!("Found {} repositories in {}", repos.len(), org.name);

            self.progress.inc_length(repos.len() as u64);
            self.progress
                .set_message(format!("Checking scanning status for {}", org.name));

            let reports = map_ordered(repos, |repo| self.enrich(repo), self.concurrency).await;
            aggregate.repositories.extend(reports);
        }

        self.progress.finish_and_clear();
        aggregate
    }

    /// Enrich one repository, substituting the placeholder on any failure
    async fn enrich(&self, repository: Repository) -> RepositoryReport {
        let enrichment = match self.fetch_enrichment(&repository.full_name).await {
            Ok(enrichment) => enrichment,
            Err(err) => {
                warn!("Failed to enrich {}: {}", repository.full_name, err);
                Enrichment::Failed {
                    reason: err.to_string(),
                }
            }
        };
        self.progress.inc(1);

        RepositoryReport {
            repository,
            enrichment,
        }
    }

    async fn fetch_enrichment(&self, full_name: &str) -> Result<Enrichment> {
        let branches = self
            .client
            .list_branches(full_name)
            .await?
            .into_iter()
            .map(|b| b.name)
            .collect();
        let code = self
            .client
            .check_scan_status(full_name, ScanKind::Code)
            .await?;
        let secret = self
            .client
            .check_scan_status(full_name, ScanKind::Secret)
            .await?;

        debug!("{}: code={:?} secret={:?}", full_name, code, secret);
        Ok(Enrichment::Complete {
            branches,
            code,
            secret,
        })
    }
}
