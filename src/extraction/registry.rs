use tracing::{debug, warn};

use crate::errors::{HarvestError, HarvestResult};
use crate::extraction::text::strip_markup;
use crate::extraction::traits::ExtractionAdapter;
use crate::extraction::{bbc::BbcAdapter, guardian::GuardianAdapter, reuters::ReutersAdapter};

pub struct AdapterRegistry {
    adapters: Vec<Box<dyn ExtractionAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Order matters: the first adapter that matches a page wins
        registry.register(Box::new(BbcAdapter::new()));
        registry.register(Box::new(GuardianAdapter::new()));
        registry.register(Box::new(ReutersAdapter::new()));

        registry
    }

    /// Registry without the built-in site adapters
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    pub fn register(&mut self, adapter: Box<dyn ExtractionAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Find the first adapter that recognizes the page
    pub fn find_adapter(&self, html: &str) -> Option<&dyn ExtractionAdapter> {
        self.adapters
            .iter()
            .find(|a| a.matches(html))
            .map(|a| a.as_ref())
    }

    /// Extract the article text, failing when no adapter recognizes the page
    pub fn try_extract(&self, html: &str) -> HarvestResult<String> {
        let adapter = self
            .find_adapter(html)
            .ok_or(HarvestError::NoMatchingExtractionAdapter)?;
        debug!(adapter = adapter.name(), "Extraction adapter selected");

        let window = match adapter.extract(html) {
            Ok(window) => window,
            Err(HarvestError::MalformedExtractionWindow { adapter, start }) => {
                warn!(%adapter, start, "End marker missing, extracting to end of document");
                html.get(start..).unwrap_or_default()
            }
            Err(e) => return Err(e),
        };

        Ok(strip_markup(window))
    }

    /// Best-effort extraction: pages no adapter understands yield empty text
    pub fn extract_body(&self, html: &str) -> String {
        match self.try_extract(html) {
            Ok(text) => text,
            Err(HarvestError::NoMatchingExtractionAdapter) => {
                debug!("No extraction adapter matched, leaving content empty");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, "Extraction failed, leaving content empty");
                String::new()
            }
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
