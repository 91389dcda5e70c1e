pub mod source;
pub mod feed;
pub mod article;

pub use source::{Source, Watermark};
pub use feed::{FeedField, FeedFields, FeedMetadata, FetchedFeed, RawEntry, NOT_MODIFIED};
pub use article::Article;
