//! Run summary reporting
//!
//! This module turns the final crawl state into a report and emits it both as
//! log lines and as a human-readable block on stdout.

use crate::state::CrawlState;
use crate::storage::MetadataStore;
use std::collections::BTreeMap;
use std::time::Duration;

/// Outcome of a completed crawl run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Number of URLs the traversal claimed
    pub visited: usize,

    /// Number of pages written with a metadata record
    pub downloaded: usize,

    /// Failed URLs and their reasons
    pub failures: BTreeMap<String, String>,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Builds a report from the end-of-run state
    pub fn from_run(state: &CrawlState, metadata: &MetadataStore, elapsed: Duration) -> Self {
        Self {
            visited: state.visited_count(),
            downloaded: metadata.len(),
            failures: state.failed().clone(),
            elapsed,
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Percentage of visited URLs that were downloaded
    pub fn success_rate(&self) -> f64 {
        if self.visited == 0 {
            0.0
        } else {
            (self.downloaded as f64 / self.visited as f64) * 100.0
        }
    }

    /// Emits the summary: one info line, then one warning per failed URL
    pub fn log_summary(&self) {
        tracing::info!(
            "Harvest completed in {:?}. Downloaded {} pages, {} failed.",
            self.elapsed,
            self.downloaded,
            self.failed()
        );

        if !self.failures.is_empty() {
            tracing::warn!("Failed to download {} pages.", self.failed());
            for (url, reason) in &self.failures {
                tracing::warn!("  {}: {}", url, reason);
            }
        }
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Summary ===\n");

    println!("Overview:");
    println!("  URLs visited: {}", report.visited);
    println!("  Pages downloaded: {}", report.downloaded);
    println!("  Pages failed: {}", report.failed());
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failed());
        for (url, reason) in &report.failures {
            println!("  - {}: {}", url, reason);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages downloaded)",
        report.success_rate(),
        report.downloaded,
        report.visited
    );
}
