//! User agent selection strategies
//!
//! Rotation only adds variety to outgoing requests; nothing depends on which
//! agent is picked, so tests can swap in a deterministic selector.

use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks the user agent for the next request from a pool
pub trait UserAgentSelector: Send + Sync {
    /// Returns `None` only when the pool is empty
    fn select<'a>(&self, pool: &'a [String]) -> Option<&'a str>;
}

/// Uniform random choice per request
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl UserAgentSelector for RandomSelector {
    fn select<'a>(&self, pool: &'a [String]) -> Option<&'a str> {
        pool.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}

/// Cycles through the pool in order
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserAgentSelector for RoundRobinSelector {
    fn select<'a>(&self, pool: &'a [String]) -> Option<&'a str> {
        if pool.is_empty() {
            return None;
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % pool.len();
        Some(pool[index].as_str())
    }
}
