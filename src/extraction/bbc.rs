use crate::errors::HarvestResult;
use crate::extraction::marker::MarkerAdapter;
use crate::extraction::traits::ExtractionAdapter;

const BODY_START: &str = r#"<p class="story-body__introduction">"#;
const BODY_END: &str = r#"<div id="share-tools">"#;

/// BBC News story pages: body opens with the introduction paragraph
pub struct BbcAdapter {
    markers: MarkerAdapter,
}

impl BbcAdapter {
    pub fn new() -> Self {
        Self {
            markers: MarkerAdapter::new("bbc", BODY_START, BODY_END),
        }
    }
}

impl Default for BbcAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionAdapter for BbcAdapter {
    fn name(&self) -> &str {
        self.markers.name()
    }

    fn matches(&self, html: &str) -> bool {
        self.markers.matches(html)
    }

    fn extract<'a>(&self, html: &'a str) -> HarvestResult<&'a str> {
        self.markers.extract(html)
    }
}
