use crate::errors::HarvestResult;
use crate::extraction::marker::MarkerAdapter;
use crate::extraction::traits::ExtractionAdapter;

// The class attribute continues with modifiers, so the markers stay open
const BODY_START: &str = r#"<div class="content__article-body"#;
const BODY_END: &str = r#"<div class="after-article"#;

/// The Guardian article pages
pub struct GuardianAdapter {
    markers: MarkerAdapter,
}

impl GuardianAdapter {
    pub fn new() -> Self {
        Self {
            markers: MarkerAdapter::new("guardian", BODY_START, BODY_END),
        }
    }
}

impl Default for GuardianAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionAdapter for GuardianAdapter {
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

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<article>
<div class="content__article-body from-content-api js-article__body" itemprop="articleBody">
<p>Opening line.</p>
<p>Closing line.</p>
</div>
<div class="after-article js-after-article"></div>
</article>"#;

    #[test]
    fn test_matches_class_with_modifiers() {
        assert!(GuardianAdapter::new().matches(PAGE));
    }

    #[test]
    fn test_extract_body_window() {
        let window = GuardianAdapter::new().extract(PAGE).unwrap();
        assert!(window.contains("Opening line."));
        assert!(window.contains("Closing line."));
        assert!(!window.contains("after-article"));
    }

    #[test]
    fn test_name() {
        assert_eq!(GuardianAdapter::new().name(), "guardian");
    }
}
