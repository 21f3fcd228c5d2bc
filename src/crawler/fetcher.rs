//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from crawler settings
//! - GET requests for seed pages
//! - Classifying failures into diagnostics

use crate::config::CrawlerConfig;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single seed
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Why a seed contributed nothing to the output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// Non-2xx response
    #[error("HTTP {0}")]
    Http(u16),

    /// Connection, TLS, redirect or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// The response was not HTML
    #[error("expected HTML, got {0}")]
    ContentMismatch(String),

    /// The body could not be read
    #[error("failed to read body: {0}")]
    Body(String),

    /// The fetch task panicked or was cancelled
    #[error("fetch task failed: {0}")]
    Task(String),
}

/// A failed seed, kept for the run diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The seed URL as requested
    pub url: String,
    pub kind: FailureKind,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.kind)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use wiki_reader::config::CrawlerConfig;
/// use wiki_reader::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a page and checks that it is HTML
///
/// A missing `Content-Type` header is treated as HTML; a present one must
/// mention `html`.
///
/// # Returns
///
/// * `Ok(FetchedPage)` - 2xx response with an HTML body
/// * `Err(FailureKind)` - Why the page was not usable
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FailureKind> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FailureKind::Http(status.as_u16()));
    }

    let final_url = response.url().to_string();

    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.to_ascii_lowercase().contains("html") {
            return Err(FailureKind::ContentMismatch(content_type.to_string()));
        }
    }

    let body = response
        .text()
        .await
        .map_err(|e| FailureKind::Body(e.to_string()))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

fn classify_error(e: reqwest::Error) -> FailureKind {
    if e.is_timeout() {
        FailureKind::Network("Request timeout".to_string())
    } else if e.is_connect() {
        FailureKind::Network(format!("Connection failed: {}", e))
    } else if e.is_redirect() {
        FailureKind::Network(format!("Redirect error: {}", e))
    } else {
        FailureKind::Network(e.to_string())
    }
}
