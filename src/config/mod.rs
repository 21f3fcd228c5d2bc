//! Configuration module for Wiki-Reader
//!
//! Every setting has a default, so running without a file crawls the
//! built-in seed list. A TOML file can override any subset of keys.
//!
//! # Example
//!
//! ```no_run
//! use wiki_reader::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wiki-reader.toml")).unwrap();
//! println!("Writing to: {}", config.output.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, DEFAULT_OUTPUT_PATH, DEFAULT_SEEDS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
