//! GitHub API client

pub mod api;
pub mod github;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod parallel;

pub use api::{ListingApi, ScanningApi};
pub use github::GitHubClient;
#[cfg(test)]
pub use mock::MockGitHubClient;
pub use models::{Repository, ScanCheck, ScanKind, ScanStatus};
pub use parallel::map_ordered;

/// Combined GitHub API surface used by the aggregation pipeline
pub trait GitHubApi: ListingApi + ScanningApi {}

impl<T: ListingApi + ScanningApi> GitHubApi for T {}
