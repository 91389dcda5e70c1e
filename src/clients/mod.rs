pub mod traits;
pub mod http_feed;
pub mod http_page;

pub use traits::{FeedClient, PageFetcher};
pub use http_feed::HttpFeedClient;
pub use http_page::HttpPageFetcher;
