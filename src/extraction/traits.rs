use crate::errors::HarvestResult;

pub trait ExtractionAdapter: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Check if this adapter recognizes the page layout
    fn matches(&self, html: &str) -> bool;

    /// Carve the article body window out of the raw page.
    ///
    /// Returns `MalformedExtractionWindow` when the body starts but never
    /// ends; the registry decides how to recover.
    fn extract<'a>(&self, html: &'a str) -> HarvestResult<&'a str>;
}
