use opml::{Outline, OPML};

use crate::domain::Source;
use crate::errors::{HarvestError, HarvestResult};
use crate::services::source_service::validate_url;
use crate::storage::traits::SourceRepository;

pub struct ImportResult {
    pub added: Vec<Source>,
    pub invalid: Vec<(String, String)>, // (url, error_message)
    pub duplicates: Vec<String>,
}

pub struct ImportExportService<R: SourceRepository> {
    repository: R,
}

impl<R: SourceRepository> ImportExportService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Import sources from OPML content
    pub fn import_opml(&self, content: &str) -> HarvestResult<ImportResult> {
        let opml = OPML::from_str(content)
            .map_err(|e| HarvestError::OpmlParse(e.to_string()))?;

        let mut result = ImportResult {
            added: Vec::new(),
            invalid: Vec::new(),
            duplicates: Vec::new(),
        };

        for raw in extract_feed_urls(&opml.body.outlines) {
            let url = match validate_url(&raw) {
                Ok(url) => url,
                Err(e) => {
                    result.invalid.push((raw, e.to_string()));
                    continue;
                }
            };

            if self.repository.exists(&url)? {
                result.duplicates.push(url);
                continue;
            }

            let source = Source::new(url.clone());
            match self.repository.add(&source) {
                Ok(id) => result.added.push(Source {
                    id: Some(id),
                    ..source
                }),
                Err(HarvestError::SourceAlreadyExists(_)) => result.duplicates.push(url),
                Err(e) => result.invalid.push((url, e.to_string())),
            }
        }

        Ok(result)
    }

    /// Export sources to OPML format
    pub fn export_opml(&self) -> HarvestResult<String> {
        let sources = self.repository.get_all()?;

        let mut opml = OPML::default();
        opml.head = Some(opml::Head {
            title: Some("Harvester Sources".to_string()),
            ..Default::default()
        });

        for source in sources {
            opml.body.outlines.push(Outline {
                text: source.url.clone(),
                r#type: Some("rss".to_string()),
                xml_url: Some(source.url),
                ..Default::default()
            });
        }

        opml.to_string()
            .map_err(|e| HarvestError::OpmlParse(e.to_string()))
    }
}

/// Recursively extract feed URLs from OPML outlines
fn extract_feed_urls(outlines: &[Outline]) -> Vec<String> {
    let mut urls = Vec::new();

    for outline in outlines {
        if let Some(url) = outline.xml_url.as_deref().filter(|u| !u.is_empty()) {
            urls.push(url.to_string());
        }
        urls.extend(extract_feed_urls(&outline.outlines));
    }

    urls
}
