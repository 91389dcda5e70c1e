use crate::domain::{Article, Source, Watermark};
use crate::errors::HarvestResult;

#[cfg_attr(test, mockall::automock)]
pub trait SourceRepository: Send + Sync {
    fn add(&self, source: &Source) -> HarvestResult<i64>;
    fn remove(&self, id: i64) -> HarvestResult<()>;
    /// All sources in the order they were added
    fn get_all(&self) -> HarvestResult<Vec<Source>>;
    fn get_by_id(&self, id: i64) -> HarvestResult<Option<Source>>;
    fn exists(&self, url: &str) -> HarvestResult<bool>;
    fn update_watermark(&self, url: &str, watermark: &Watermark) -> HarvestResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ArticleRepository: Send + Sync {
    /// Returns false when an article with the same link is already archived
    fn save(&self, source_id: i64, article: &Article) -> HarvestResult<bool>;
    fn recent(&self, limit: usize) -> HarvestResult<Vec<Article>>;
    fn count_for_source(&self, source_id: i64) -> HarvestResult<usize>;
}
