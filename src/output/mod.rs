//! Output module for reporting crawl results
//!
//! This module handles:
//! - Summarizing a finished run (downloaded and failed counts)
//! - Logging the summary and every failed URL
//! - Printing a human-readable report for the CLI

pub mod stats;

pub use stats::{print_report, CrawlReport};
