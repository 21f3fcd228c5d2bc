//! Crawler module for page fetching and text extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and failure classification
//! - Paragraph text extraction
//! - Per-domain politeness limiting
//! - The concurrent engine and the end-to-end pipeline

mod coordinator;
mod engine;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_pipeline, Coordinator, BUILTIN_CONFIG_HASH};
pub use engine::{CrawlReport, Engine};
pub use fetcher::{build_http_client, fetch_page, FailureKind, FetchFailure, FetchedPage};
pub use parser::{compile_selector, extract_fragments};
pub use scheduler::DomainLimiter;
