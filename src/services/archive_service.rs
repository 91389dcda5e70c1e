use tracing::debug;

use crate::domain::{Article, Source};
use crate::errors::{HarvestError, HarvestResult};
use crate::storage::traits::ArticleRepository;

pub struct ArchiveService<A: ArticleRepository> {
    repository: A,
}

impl<A: ArticleRepository> ArchiveService<A> {
    pub fn new(repository: A) -> Self {
        Self { repository }
    }

    /// Archive harvested articles for a source, returning how many were new
    pub fn store(&self, source: &Source, articles: &[Article]) -> HarvestResult<usize> {
        let source_id = source
            .id
            .ok_or_else(|| HarvestError::SourceNotFound(format!("{} has no ID", source.url)))?;

        let mut stored = 0;
        for article in articles {
            if self.repository.save(source_id, article)? {
                stored += 1;
            } else {
                debug!(link = %article.link, "Article already archived");
            }
        }

        Ok(stored)
    }

    /// Number of archived articles harvested from a source
    pub fn count_for(&self, source: &Source) -> HarvestResult<usize> {
        match source.id {
            Some(id) => self.repository.count_for_source(id),
            None => Ok(0),
        }
    }

    /// Most recently published archived articles
    pub fn recent(&self, limit: usize) -> HarvestResult<Vec<Article>> {
        self.repository.recent(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::MockArticleRepository;
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn article(link: &str) -> Article {
        Article {
            headline: "Headline".to_string(),
            link: link.to_string(),
            summary: String::new(),
            published_at: NaiveDate::from_ymd_opt(2006, 1, 2)
                .unwrap()
                .and_hms_opt(15, 4, 5)
                .unwrap(),
            content: "Body".to_string(),
        }
    }

    fn source() -> Source {
        Source {
            id: Some(7),
            ..Source::new("https://example.com/feed")
        }
    }

    #[test]
    fn test_store_counts_new_articles() {
        let mut repo = MockArticleRepository::new();
        repo.expect_save()
            .with(eq(7_i64), mockall::predicate::always())
            .times(2)
            .returning(|_, article| Ok(article.link.ends_with("new")));

        let service = ArchiveService::new(repo);
        let stored = service
            .store(
                &source(),
                &[article("https://example.com/new"), article("https://example.com/old")],
            )
            .unwrap();

        assert_eq!(stored, 1);
    }

    #[test]
    fn test_store_requires_persisted_source() {
        let mut repo = MockArticleRepository::new();
        repo.expect_save().never();

        let service = ArchiveService::new(repo);
        let result = service.store(
            &Source::new("https://example.com/feed"),
            &[article("https://example.com/a")],
        );

        assert!(matches!(result, Err(HarvestError::SourceNotFound(_))));
    }

    #[test]
    fn test_count_for_source() {
        let mut repo = MockArticleRepository::new();
        repo.expect_count_for_source()
            .with(eq(7_i64))
            .times(1)
            .returning(|_| Ok(3));

        let service = ArchiveService::new(repo);
        assert_eq!(service.count_for(&source()).unwrap(), 3);
    }

    #[test]
    fn test_count_for_unsaved_source_is_zero() {
        let mut repo = MockArticleRepository::new();
        repo.expect_count_for_source().never();

        let service = ArchiveService::new(repo);
        let count = service
            .count_for(&Source::new("https://example.com/feed"))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_recent_delegates_to_repository() {
        let mut repo = MockArticleRepository::new();
        repo.expect_recent()
            .with(eq(5_usize))
            .returning(|_| Ok(vec![article("https://example.com/a")]));

        let service = ArchiveService::new(repo);
        assert_eq!(service.recent(5).unwrap().len(), 1);
    }
}
