//! API trait definitions split by responsibility
//!
//! - [`ListingApi`] - Repository and branch listings
//! - [`ScanningApi`] - Code and secret scanning status
//!
//! The [`GitHubApi`](super::GitHubApi) super-trait combines both.

mod listing;
mod scanning;

pub use listing::ListingApi;
pub use scanning::ScanningApi;
