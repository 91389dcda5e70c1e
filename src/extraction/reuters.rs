use crate::errors::HarvestResult;
use crate::extraction::marker::MarkerAdapter;
use crate::extraction::traits::ExtractionAdapter;

const BODY_START: &str = r#"<div class="StandardArticleBody_body">"#;
const BODY_END: &str = r#"</p><div class="Attribution_container">"#;

/// Reuters standard article layout
pub struct ReutersAdapter {
    markers: MarkerAdapter,
}

impl ReutersAdapter {
    pub fn new() -> Self {
        Self {
            markers: MarkerAdapter::new("reuters", BODY_START, BODY_END),
        }
    }
}

impl Default for ReutersAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionAdapter for ReutersAdapter {
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
