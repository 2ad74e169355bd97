//! Pagination helpers for API requests
//!
//! GitHub list endpoints take 1-indexed `page` and `per_page` query parameters
//! and give no total count in the body, so pages are walked one after another.

use std::future::Future;

use log::debug;

use crate::error::Result;

/// Maximum page size supported by the GitHub REST API.
pub const MAX_PAGE_SIZE: usize = 100;

/// GitHub pages are 1-indexed.
pub const FIRST_PAGE: usize = 1;

/// Pagination parameters for API requests.
///
/// # Example
/// ```ignore
/// let params = PaginationParams::new().page_size(100).page(2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Number of items per page (default: 100, max: 100)
    pub page_size: Option<usize>,
    /// Page number, starting at 1
    pub page: Option<usize>,
}

impl PaginationParams {
    /// Create new pagination params with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size (items per page), clamped to the API maximum.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.clamp(1, MAX_PAGE_SIZE));
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Effective page size sent to the API.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.unwrap_or(MAX_PAGE_SIZE)
    }

    /// Convert to query string parameters.
    ///
    /// `per_page` is always included, defaulting to the maximum to minimize API calls.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }

        params.push(("per_page", self.effective_page_size().to_string()));

        params
    }
}

/// Fetch pages sequentially until one comes back empty, concatenating
/// results in page order.
///
/// The first failing page aborts the walk and its error is returned; no
/// retries are attempted.
pub async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PaginationParams) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all_items = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let params = PaginationParams::new().page_size(page_size).page(page);
        let items = fetch_page(params).await?;
        let count = items.len();
        debug!("Page {} returned {} items", page, count);

        if count == 0 {
            break;
        }
        all_items.extend(items);
        page += 1;
    }

    Ok(all_items)
}
