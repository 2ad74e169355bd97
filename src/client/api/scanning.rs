//! Scanning API trait

use async_trait::async_trait;

use crate::client::models::{ScanCheck, ScanKind};
use crate::error::Result;

/// Code and secret scanning status queries
#[async_trait]
pub trait ScanningApi: Send + Sync {
    /// Check whether `kind` scanning is enabled for a repository and count its open alerts.
    ///
    /// Endpoint failures come back as [`ScanCheck::Failed`] rather than `Err`;
    /// `Err` is reserved for failures an implementation chooses not to contain.
    async fn check_scan_status(&self, full_name: &str, kind: ScanKind) -> Result<ScanCheck>;
}
