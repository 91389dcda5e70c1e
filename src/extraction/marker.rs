use crate::errors::{HarvestError, HarvestResult};
use crate::extraction::traits::ExtractionAdapter;

/// Adapter driven by literal boundary markers in the page source.
///
/// The body window runs from the start marker (inclusive) to the first end
/// marker found after it (exclusive).
#[derive(Debug, Clone)]
pub struct MarkerAdapter {
    name: String,
    detect: String,
    start: String,
    end: String,
}

impl MarkerAdapter {
    /// Detection uses the start marker unless overridden with [`Self::with_detect`]
    pub fn new(name: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        let start = start.into();
        Self {
            name: name.into(),
            detect: start.clone(),
            start,
            end: end.into(),
        }
    }

    pub fn with_detect(mut self, detect: impl Into<String>) -> Self {
        self.detect = detect.into();
        self
    }

    pub fn start_marker(&self) -> &str {
        &self.start
    }

    pub fn end_marker(&self) -> &str {
        &self.end
    }
}

impl ExtractionAdapter for MarkerAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, html: &str) -> bool {
        html.contains(&self.detect)
    }

    fn extract<'a>(&self, html: &'a str) -> HarvestResult<&'a str> {
        let start = html
            .find(&self.start)
            .ok_or(HarvestError::NoMatchingExtractionAdapter)?;

        match html[start..].find(&self.end) {
            Some(len) => Ok(&html[start..start + len]),
            None => Err(HarvestError::MalformedExtractionWindow {
                adapter: self.name.clone(),
                start,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> MarkerAdapter {
        MarkerAdapter::new("test", "<main>", "</main>")
    }

    #[test]
    fn test_window_includes_start_excludes_end() {
        let html = "<html><main><p>Body</p></main><footer/></html>";
        assert_eq!(adapter().extract(html).unwrap(), "<main><p>Body</p>");
    }

    #[test]
    fn test_end_marker_before_start_is_ignored() {
        let html = "</main> junk <main>Body</main>";
        assert_eq!(adapter().extract(html).unwrap(), "<main>Body");
    }

    #[test]
    fn test_missing_end_marker_reports_start_offset() {
        let html = "header <main>Body without end";
        match adapter().extract(html) {
            Err(HarvestError::MalformedExtractionWindow { adapter, start }) => {
                assert_eq!(adapter, "test");
                assert_eq!(start, 7);
            }
            other => panic!("expected malformed window, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_start_marker() {
        assert!(matches!(
            adapter().extract("<p>nothing here</p>"),
            Err(HarvestError::NoMatchingExtractionAdapter)
        ));
    }

    #[test]
    fn test_custom_detect_marker() {
        let adapter = adapter().with_detect("data-site=\"example\"");

        assert!(adapter.matches("<body data-site=\"example\"><main>x</main>"));
        assert!(!adapter.matches("<body><main>x</main>"));
        assert_eq!(adapter.start_marker(), "<main>");
        assert_eq!(adapter.end_marker(), "</main>");
    }
}
