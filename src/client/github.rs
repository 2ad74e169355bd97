//! GitHub REST API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use super::api::{ListingApi, ScanningApi};
use super::models::{Branch, Repository, ScanCheck, ScanKind};
use super::pagination::{PaginationParams, collect_pages};
use crate::config::GitHubSettings;
use crate::error::{ApiError, Error, Result};

/// Media type requested from the API
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("ghas-report/", env!("CARGO_PKG_VERSION"));

/// GitHub API client
pub struct GitHubClient {
    http: HttpClient,
    base_url: String,
    token: String,
    page_size: usize,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

/// Error body returned by the GitHub API
#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

impl GitHubClient {
    /// Create a new client authenticated with `token`
    pub fn new(token: impl Into<String>, settings: &GitHubSettings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let per_second =
            NonZeroU32::new(settings.requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            page_size: settings.page_size,
            rate_limiter,
        })
    }

    /// Endpoint URL with each path segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::BadRequest(format!("Invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::BadRequest(format!("Invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authenticated GET request, returning the raw response
    async fn send(&self, url: Url, query: &[(&str, String)]) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .map_err(ApiError::from)?;

        Ok(response)
    }

    /// Send a GET request and decode a successful JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = Self::check_status(self.send(url, query).await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into())
    }

    /// Map non-success statuses to [`ApiError`]
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => {
                if let Some(wait) = rate_limit_wait(&response) {
                    return Err(ApiError::RateLimit(wait).into());
                }
                Err(ApiError::Forbidden(error_message(response, "Forbidden").await).into())
            }
            StatusCode::NOT_FOUND => {
                Err(ApiError::NotFound(error_message(response, "Not Found").await).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let wait = retry_after(&response).unwrap_or(Duration::from_secs(60));
                Err(ApiError::RateLimit(wait).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ApiError::BadRequest(error_message(response, "Bad request").await).into())
            }
            status if status.is_server_error() => {
                let fallback = format!("Server error: {}", status);
                Err(ApiError::ServerError(error_message(response, &fallback).await).into())
            }
            _ => Err(ApiError::UnexpectedStatus(status.as_u16()).into()),
        }
    }
}

/// `owner/repo` as separate path segments
fn repo_segments(full_name: &str) -> Vec<&str> {
    full_name.split('/').collect()
}

/// Extract GitHub's `message` field, falling back to the raw body
async fn error_message(response: Response, fallback: &str) -> String {
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => serde_json::from_str::<GitHubErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body),
        _ => fallback.to_string(),
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Primary rate limits arrive as 403 with `x-ratelimit-remaining: 0`
fn rate_limit_wait(response: &Response) -> Option<Duration> {
    let headers = response.headers();
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())?;
    if remaining != "0" {
        return retry_after(response);
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_default();
    let wait = (reset - chrono::Utc::now().timestamp()).max(0) as u64;
    Some(Duration::from_secs(wait))
}

#[async_trait]
impl ListingApi for GitHubClient {
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["orgs", org, "repos"])?;
        let repos = collect_pages(self.page_size, |params| {
            let query = params.to_query_params();
            let url = url.clone();
            async move { self.get_json::<Vec<Repository>>(url, &query).await }
        })
        .await?;

        debug!("Organization {} has {} repositories", org, repos.len());
        Ok(repos)
    }

    async fn list_branches(&self, full_name: &str) -> Result<Vec<Branch>> {
        let mut segments = vec!["repos"];
        segments.extend(repo_segments(full_name));
        segments.push("branches");

        let query = PaginationParams::new().page_size(self.page_size).to_query_params();
        self.get_json(self.endpoint(&segments)?, &query).await
    }
}

#[async_trait]
impl ScanningApi for GitHubClient {
    async fn check_scan_status(&self, full_name: &str, kind: ScanKind) -> Result<ScanCheck> {
        let mut segments = vec!["repos"];
        segments.extend(repo_segments(full_name));
        segments.extend([kind.endpoint(), "alerts"]);

        // One request; the count is the number of open alerts on the first page
        let mut query = vec![("state", "open".to_string())];
        query.extend(PaginationParams::new().page_size(self.page_size).to_query_params());
        let alerts = match self.endpoint(&segments) {
            Ok(url) => self.get_json::<Vec<IgnoredAny>>(url, &query).await,
            Err(err) => Err(err),
        };

        let check = match alerts {
            Ok(alerts) => ScanCheck::Enabled {
                alerts: alerts.len(),
            },
            Err(Error::Api(ApiError::NotFound(_))) => ScanCheck::Disabled,
            Err(err) => {
                debug!("{} scanning check failed for {}: {}", kind, full_name, err);
                ScanCheck::Failed {
                    cause: err.to_string(),
                }
            }
        };

        Ok(check)
    }
}
