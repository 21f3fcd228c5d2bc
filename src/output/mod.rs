//! Output module for persisting and checking crawl results
//!
//! This module handles:
//! - Writing page records as line-delimited JSON
//! - Validating the written artifact before a run reports success
//! - Summarizing a finished run

mod jsonl;
mod summary;
mod validation;

pub use jsonl::{write_records, WriteReport};
pub use summary::{print_summary, RunSummary};
pub use validation::{validate_jsonl_structure, validate_output_file};

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or validating the artifact
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot create output file {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output file does not exist: {path}")]
    Missing { path: PathBuf },

    #[error("Output file is empty: {path}")]
    Empty { path: PathBuf },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// How the structural check reads the artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonlMode {
    /// Exactly one JSON object per line
    #[default]
    Strict,

    /// Any whitespace-separated sequence of JSON objects
    Stream,
}
