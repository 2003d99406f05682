//! Configuration module for seo-sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: [`Config::default`] carries the same values
//! an empty file would produce.
//!
//! # Example
//!
//! ```no_run
//! use seo_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Sitemap walk will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate as validate_config;
