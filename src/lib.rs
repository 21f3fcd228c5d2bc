//! Wiki-Reader: a polite paragraph harvester
//!
//! This crate fetches a fixed list of pages, extracts paragraph text, merges
//! it into one record per page and writes the records as line-delimited JSON,
//! validating the artifact before reporting success.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

pub use output::OutputError;

/// Main error type for Wiki-Reader operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL validation failed: {0}")]
    Url(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Invalid element selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Seed URL errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL list is empty")]
    EmptyInput,

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, CrawlReport, Engine, FetchFailure, FailureKind};
pub use output::{JsonlMode, RunSummary};
pub use state::{PageRecord, RecordSet};
pub use crate::url::{extract_domain, parse_seeds, validate_urls};
