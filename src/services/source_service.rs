use tracing::warn;
use url::Url;

use crate::domain::Source;
use crate::errors::{HarvestError, HarvestResult};
use crate::services::poll_service::CycleResult;
use crate::storage::traits::SourceRepository;

/// Parse a feed URL, accepting only http and https
pub fn validate_url(raw: &str) -> HarvestResult<String> {
    let url = Url::parse(raw.trim()).map_err(|e| HarvestError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(HarvestError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, scheme
        ))),
    }
}

pub struct SourceService<R: SourceRepository> {
    repository: R,
}

impl<R: SourceRepository> SourceService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Add a new source by URL
    /// New sources have never been polled
    pub fn add(&self, url: &str) -> HarvestResult<Source> {
        let url = validate_url(url)?;

        if self.repository.exists(&url)? {
            return Err(HarvestError::SourceAlreadyExists(url));
        }

        let source = Source::new(url);
        let id = self.repository.add(&source)?;

        Ok(Source {
            id: Some(id),
            ..source
        })
    }

    /// Remove a source by ID
    pub fn remove(&self, id: i64) -> HarvestResult<()> {
        if self.repository.get_by_id(id)?.is_none() {
            return Err(HarvestError::SourceNotFound(id.to_string()));
        }
        self.repository.remove(id)
    }

    /// List all sources
    pub fn list(&self) -> HarvestResult<Vec<Source>> {
        self.repository.get_all()
    }

    /// Get a source by ID
    pub fn get(&self, id: i64) -> HarvestResult<Option<Source>> {
        self.repository.get_by_id(id)
    }

    /// Check if a source URL already exists
    pub fn exists(&self, url: &str) -> HarvestResult<bool> {
        self.repository.exists(url)
    }

    /// Store the watermarks of a finished cycle, returning how many were written.
    /// Sources removed while the cycle ran are skipped.
    pub fn record_cycle(&self, result: &CycleResult) -> HarvestResult<usize> {
        let mut recorded = 0;

        for report in &result.reports {
            match self.repository.update_watermark(&report.url, &report.watermark) {
                Ok(()) => recorded += 1,
                Err(HarvestError::SourceNotFound(url)) => {
                    warn!(%url, "Source disappeared during the cycle, watermark not stored");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Watermark;
    use crate::services::poll_service::{SourceOutcome, SourceReport};
    use crate::storage::sqlite::{SqliteSourceRepository, SqliteStorage};
    use crate::storage::traits::MockSourceRepository;
    use mockall::predicate::eq;

    fn setup() -> SourceService<SqliteSourceRepository> {
        let storage = SqliteStorage::in_memory().unwrap();
        let repo = SqliteSourceRepository::new(storage);
        SourceService::new(repo)
    }

    fn report(url: &str, watermark: Watermark) -> SourceReport {
        SourceReport {
            url: url.to_string(),
            outcome: SourceOutcome::Fetched,
            articles: Vec::new(),
            watermark,
        }
    }

    #[test]
    fn test_list_empty() {
        let service = setup();
        let sources = service.list().unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_add_starts_never_polled() {
        let service = setup();
        let source = service.add("https://example.com/feed").unwrap();

        assert!(source.id.is_some());
        assert_eq!(source.watermark, Watermark::Never);
        assert!(service.exists("https://example.com/feed").unwrap());
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let service = setup();
        service.add("https://example.com/feed").unwrap();

        let result = service.add("https://example.com/feed");
        assert!(matches!(result, Err(HarvestError::SourceAlreadyExists(_))));
    }

    #[test]
    fn test_invalid_urls_rejected() {
        let service = setup();

        assert!(matches!(service.add("not a url"), Err(HarvestError::InvalidUrl(_))));
        assert!(matches!(
            service.add("ftp://example.com/feed"),
            Err(HarvestError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_remove_unknown_source() {
        let service = setup();
        assert!(matches!(service.remove(42), Err(HarvestError::SourceNotFound(_))));
    }

    #[test]
    fn test_record_cycle_stores_watermarks() {
        let service = setup();
        let source = service.add("https://example.com/feed").unwrap();

        let result = CycleResult {
            reports: vec![report(&source.url, Watermark::at("2006-01-04T10:00:00Z"))],
        };
        assert_eq!(service.record_cycle(&result).unwrap(), 1);

        let stored = service.get(source.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.watermark, Watermark::at("2006-01-04T10:00:00Z"));
    }

    #[test]
    fn test_record_cycle_skips_removed_sources() {
        let mut repo = MockSourceRepository::new();
        repo.expect_update_watermark()
            .with(eq("https://gone.example.com"), eq(Watermark::Never))
            .times(1)
            .returning(|url, _| Err(HarvestError::SourceNotFound(url.to_string())));
        repo.expect_update_watermark()
            .with(eq("https://kept.example.com"), eq(Watermark::Never))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = SourceService::new(repo);
        let result = CycleResult {
            reports: vec![
                report("https://gone.example.com", Watermark::Never),
                report("https://kept.example.com", Watermark::Never),
            ],
        };

        assert_eq!(service.record_cycle(&result).unwrap(), 1);
    }
}
