//! Crawl state shared between concurrent fetch tasks
//!
//! The record set is the only mutable state touched by extraction callbacks.

mod records;

pub use records::{PageRecord, RecordSet};
