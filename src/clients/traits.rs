use async_trait::async_trait;

use crate::domain::{FetchedFeed, Watermark};
use crate::errors::HarvestResult;

/// Turns a feed URL into structured metadata and entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the feed, using `since` as the conditional-fetch hint.
    ///
    /// When the server confirms nothing changed, the returned feed carries
    /// status [`crate::domain::NOT_MODIFIED`] and no entries.
    async fn fetch_feed(&self, url: &str, since: &Watermark) -> HarvestResult<FetchedFeed>;
}

/// Fetches the raw markup of an article page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> HarvestResult<String>;
}
