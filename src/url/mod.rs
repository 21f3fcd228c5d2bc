//! URL handling module for Wiki-Reader
//!
//! This module provides the pre-crawl seed gate and the domain key used for
//! per-host politeness.

mod domain;
mod validate;

pub use domain::extract_domain;
pub use validate::{parse_seeds, validate_urls};
