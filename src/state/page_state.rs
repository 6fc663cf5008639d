/// Page state definitions for tracking crawl progress
///
/// A URL moves `Unvisited -> InProgress -> {Downloaded, Failed}` and never
/// leaves a terminal state within a run.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// URL has not been dispatched to the fetcher
    Unvisited,

    /// URL is in the visited set and its fetch has begun
    InProgress,

    // ===== Terminal States =====
    /// Page body was written and a metadata record exists
    Downloaded,

    /// Fetch failed; the reason is kept in the failure map
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Downloaded | Self::Failed)
    }

    /// Returns true if the URL has been claimed by the traversal
    pub fn is_visited(&self) -> bool {
        !matches!(self, Self::Unvisited)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::InProgress)
                | (Self::InProgress, Self::Downloaded)
                | (Self::InProgress, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::InProgress => "in_progress",
            Self::Downloaded => "downloaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
