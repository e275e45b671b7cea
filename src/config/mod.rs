//! Configuration module for Sozluk-Ripple
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file
//! is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use sozluk_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Delay between pages: {}ms", config.scraper.delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, LoggingConfig, OutputConfig, RetryConfig, ScraperConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
