//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the lifecycle of a single URL (unvisited, in progress, downloaded, failed)
//! - `CrawlState`: the visited set and failure map owned by one crawl run

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageState;
