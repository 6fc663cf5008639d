//! Per-run traversal state: the visited set and the failure map

use crate::state::PageState;
use crate::HarvestError;
use std::collections::{BTreeMap, HashMap};

/// Tracks every URL the traversal has claimed and how it ended
///
/// A URL enters this state exactly once, before its fetch begins, and is never
/// removed during the run. The keys of `pages` are the visited set.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Visited URLs and their current state
    pages: HashMap<String, PageState>,

    /// Failed URLs and the reason each one failed
    failed: BTreeMap<String, String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the URL has already been dispatched
    pub fn is_visited(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Returns the state of a URL, `Unvisited` if the traversal never claimed it
    pub fn state_of(&self, url: &str) -> PageState {
        self.pages
            .get(url)
            .copied()
            .unwrap_or(PageState::Unvisited)
    }

    /// Claims a URL for processing
    ///
    /// Returns `false` without changing anything if the URL was already
    /// visited; this is the traversal's only duplicate and cycle guard.
    pub fn begin(&mut self, url: &str) -> bool {
        if self.pages.contains_key(url) {
            return false;
        }
        self.pages.insert(url.to_string(), PageState::InProgress);
        true
    }

    /// Moves an in-progress URL to `Downloaded`
    pub fn mark_downloaded(&mut self, url: &str) -> Result<(), HarvestError> {
        self.transition(url, PageState::Downloaded)
    }

    /// Moves an in-progress URL to `Failed` and records why
    pub fn mark_failed(&mut self, url: &str, reason: impl Into<String>) -> Result<(), HarvestError> {
        self.transition(url, PageState::Failed)?;
        self.failed.insert(url.to_string(), reason.into());
        Ok(())
    }

    fn transition(&mut self, url: &str, next: PageState) -> Result<(), HarvestError> {
        let current = self.state_of(url);
        if !current.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                url: url.to_string(),
                from: current,
                to: next,
            });
        }
        self.pages.insert(url.to_string(), next);
        Ok(())
    }

    /// Failed URLs with their reasons, sorted by URL
    pub fn failed(&self) -> &BTreeMap<String, String> {
        &self.failed
    }

    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn visited_count(&self) -> usize {
        self.pages.len()
    }

    pub fn downloaded_count(&self) -> usize {
        self.pages
            .values()
            .filter(|state| **state == PageState::Downloaded)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
