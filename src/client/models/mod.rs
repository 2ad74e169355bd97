//! GitHub API data models
//!
//! Domain types returned by (or derived from) the GitHub REST API.

mod repo;
mod scan;

pub use repo::{Branch, Repository};
pub use scan::{ScanCheck, ScanKind, ScanStatus};
