//! Concurrent fetch/extract engine
//!
//! Every seed gets its own task. Tasks queue on their domain's politeness
//! slots, so parallelism is bounded per host rather than globally. Fragment
//! callbacks run on whichever worker finished the fetch.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page, FailureKind, FetchFailure};
use crate::crawler::parser::{compile_selector, extract_fragments};
use crate::crawler::scheduler::DomainLimiter;
use crate::url::extract_domain;
use crate::HarvestError;
use reqwest::Client;
use scraper::Selector;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

/// What a crawl produced besides the fragments themselves
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Seeds fetched and parsed successfully
    pub pages_fetched: usize,

    /// Fragment callbacks fired across all pages
    pub fragments_seen: usize,

    /// Seeds that failed, in seed order
    pub failures: Vec<FetchFailure>,
}

/// Fetches seed pages and streams their matching element text to a callback
pub struct Engine {
    client: Client,
    selector: Arc<Selector>,
    limiter: Arc<DomainLimiter>,
}

impl Engine {
    /// Creates an engine from crawler settings
    ///
    /// No network activity happens here.
    pub fn new(config: &CrawlerConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            client: build_http_client(config)?,
            selector: Arc::new(compile_selector(&config.selector)?),
            limiter: Arc::new(DomainLimiter::from_config(config)),
        })
    }

    /// Crawls every seed and waits for all of them to finish
    ///
    /// `on_fragment` receives the seed URL and one trimmed, non-empty text
    /// per matching element, possibly from several workers at once. A failed
    /// seed is logged and recorded in the report; it never stops the others.
    /// A callback that panics fails its seed as [`FailureKind::Task`], but
    /// fragments it accepted before the panic are not taken back.
    ///
    /// Returns only after every fetch has succeeded or failed.
    pub async fn crawl<F>(&self, seeds: &[Url], on_fragment: F) -> CrawlReport
    where
        F: Fn(&Url, &str) + Send + Sync + 'static,
    {
        let on_fragment = Arc::new(on_fragment);

        let handles: Vec<(Url, JoinHandle<Result<usize, FailureKind>>)> = seeds
            .iter()
            .map(|seed| {
                let handle = self.spawn_fetch(seed.clone(), Arc::clone(&on_fragment));
                (seed.clone(), handle)
            })
            .collect();

        tracing::info!("Dispatched {} fetches", handles.len());

        let mut report = CrawlReport::default();

        for (url, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(FailureKind::Task(e.to_string())),
            };

            match outcome {
                Ok(fragments) => {
                    tracing::debug!("Extracted {} fragments from {}", fragments, url);
                    report.pages_fetched += 1;
                    report.fragments_seen += fragments;
                }
                Err(kind) => {
                    tracing::warn!("Request URL: {} failed: {}", url, kind);
                    report.failures.push(FetchFailure {
                        url: url.to_string(),
                        kind,
                    });
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages fetched, {} failed, {} fragments",
            report.pages_fetched,
            report.failures.len(),
            report.fragments_seen
        );

        report
    }

    fn spawn_fetch<F>(&self, url: Url, on_fragment: Arc<F>) -> JoinHandle<Result<usize, FailureKind>>
    where
        F: Fn(&Url, &str) + Send + Sync + 'static,
    {
        let client = self.client.clone();
        let selector = Arc::clone(&self.selector);
        let limiter = Arc::clone(&self.limiter);

        tokio::spawn(async move {
            let domain = extract_domain(&url).unwrap_or_default();

            let page = limiter.throttle(&domain, fetch_page(&client, &url)).await?;
            tracing::debug!(
                "Fetched {} (HTTP {}, {} bytes)",
                page.final_url,
                page.status_code,
                page.body.len()
            );

            Ok(extract_fragments(&page.body, &selector, |text| {
                (*on_fragment)(&url, text)
            }))
        })
    }
}
