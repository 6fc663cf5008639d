//! Configuration module for Page-Harvester
//!
//! This module handles loading, parsing, and validating crawl settings, and
//! turning them into the immutable [`CrawlConfig`] a run is driven by.
//!
//! # Example
//!
//! ```no_run
//! use page_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Mirroring {} into {}", config.base_url(), config.output_root().display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, CrawlSection, CrawlSettings, OutputSection, UserAgentSection,
    DEFAULT_USER_AGENTS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_settings, load_settings_with_hash};
