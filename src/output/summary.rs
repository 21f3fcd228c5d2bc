//! Run summary reporting

use crate::crawler::FetchFailure;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a successful pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records written and validated
    pub record_count: usize,

    /// Pages fetched and parsed successfully
    pub pages_fetched: usize,

    /// Fetches that failed, in seed order
    pub failures: Vec<FetchFailure>,

    /// Records dropped by the writer because they failed to encode
    pub records_skipped: usize,

    /// Wall time from the first fetch to the validated artifact
    pub elapsed: Duration,

    /// Location of the artifact
    pub output_path: PathBuf,

    /// Artifact size in bytes
    pub output_bytes: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Fingerprint of the configuration that drove the run
    pub config_hash: String,
}

impl RunSummary {
    /// Returns the number of failed fetches
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Wiki-Reader Run Summary ===\n");
    println!("Started:  {}", summary.started_at.to_rfc3339());
    println!("Finished: {}", summary.finished_at.to_rfc3339());
    println!("Config:   {}", summary.config_hash);
    println!();
    println!("Pages fetched:   {}", summary.pages_fetched);
    println!("Failed fetches:  {}", summary.failed_count());
    for failure in &summary.failures {
        println!("  - {}", failure);
    }
    if summary.records_skipped > 0 {
        println!("Records skipped: {}", summary.records_skipped);
    }
    println!();
    println!("Scraping completed in {:.2?}", summary.elapsed);
    println!(
        "Successfully scraped {} pages and saved to {} ({} bytes)",
        summary.record_count,
        summary.output_path.display(),
        summary.output_bytes
    );
}
