//! Pipeline coordinator - end-to-end run orchestration
//!
//! This module ties the stages together in order:
//! - Validating seeds before any network activity
//! - Crawling and merging fragments into the record set
//! - Writing the artifact
//! - Validating the artifact and summarizing the run

use crate::config::Config;
use crate::crawler::engine::{CrawlReport, Engine};
use crate::output::{
    validate_jsonl_structure, validate_output_file, write_records, RunSummary,
};
use crate::state::{PageRecord, RecordSet};
use crate::url::parse_seeds;
use crate::HarvestError;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Hash reported when the run uses the built-in configuration
pub const BUILTIN_CONFIG_HASH: &str = "built-in";

/// Main pipeline coordinator structure
pub struct Coordinator {
    config: Config,
    seeds: Vec<Url>,
    engine: Engine,
    config_hash: String,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Seeds are validated here, so an invalid list is rejected before the
    /// HTTP client exists.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Seeds are valid and the engine is ready
    /// * `Err(HarvestError::Url)` - The seed list is empty or has a bad entry
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let seeds = parse_seeds(&config.seeds)?;
        tracing::info!("Validated {} seed URLs", seeds.len());

        let engine = Engine::new(&config.crawler)?;

        Ok(Self {
            config,
            seeds,
            engine,
            config_hash: BUILTIN_CONFIG_HASH.to_string(),
        })
    }

    /// Sets the configuration fingerprint reported in the summary
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = hash.into();
        self
    }

    /// Runs the full pipeline
    ///
    /// 1. Crawls every seed and merges fragments per URL
    /// 2. Writes the records to the configured path
    /// 3. Checks that the artifact exists and is non-empty
    /// 4. Checks every record's structure
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let started_at = Utc::now();
        let start_time = Instant::now();

        let (records, report) = self.crawl().await;
        tracing::info!("Aggregated {} records", records.len());

        let output_path = PathBuf::from(&self.config.output.path);
        let write = write_records(&output_path, &records)?;

        let output_bytes = validate_output_file(&output_path)?;
        let record_count = validate_jsonl_structure(&output_path, self.config.output.jsonl_mode)?;

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Run completed: {} records in {:?} ({} bytes)",
            record_count,
            elapsed,
            output_bytes
        );

        Ok(RunSummary {
            record_count,
            pages_fetched: report.pages_fetched,
            failures: report.failures,
            records_skipped: write.skipped,
            elapsed,
            output_path,
            output_bytes,
            started_at,
            finished_at: Utc::now(),
            config_hash: self.config_hash.clone(),
        })
    }

    /// Crawls the seeds and returns the finished records with the report
    pub async fn crawl(&self) -> (Vec<PageRecord>, CrawlReport) {
        let records = Arc::new(RecordSet::new());
        let sink = Arc::clone(&records);

        let report = self
            .engine
            .crawl(&self.seeds, move |url, text| sink.merge(url.as_str(), text))
            .await;

        // Every task has joined, so the callback's handle is gone
        let records = match Arc::try_unwrap(records) {
            Ok(records) => records.into_records(),
            Err(shared) => shared.snapshot(),
        };

        (records, report)
    }

    /// Returns the validated seeds
    pub fn seeds(&self) -> &[Url] {
        &self.seeds
    }
}

/// Validates, crawls, writes and checks in one call
pub async fn run_pipeline(config: Config) -> Result<RunSummary, HarvestError> {
    Coordinator::new(config)?.run().await
}
