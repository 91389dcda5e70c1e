use chrono::NaiveDateTime;

use crate::domain::Article;
use crate::errors::{HarvestError, HarvestResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::ArticleRepository;

const STORED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SqliteArticleRepository {
    storage: SqliteStorage,
}

impl SqliteArticleRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl ArticleRepository for SqliteArticleRepository {
    fn save(&self, source_id: i64, article: &Article) -> HarvestResult<bool> {
        let conn = self.storage.connection()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO articles (source_id, link, headline, summary, published_at, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                source_id,
                &article.link,
                &article.headline,
                &article.summary,
                article.published_at.format(STORED_TIME_FORMAT).to_string(),
                &article.content,
            ),
        )?;
        Ok(inserted > 0)
    }

    fn recent(&self, limit: usize) -> HarvestResult<Vec<Article>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT headline, link, summary, published_at, content FROM articles
             ORDER BY published_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let published_at: String = row.get(3)?;
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                published_at,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut articles = Vec::new();
        for row in rows {
            let (headline, link, summary, published_at, content) = row?;
            let published_at = NaiveDateTime::parse_from_str(&published_at, STORED_TIME_FORMAT)
                .map_err(|_| HarvestError::UnsupportedTimeFormat(published_at))?;

            articles.push(Article {
                headline,
                link,
                summary,
                published_at,
                content,
            });
        }

        Ok(articles)
    }

    fn count_for_source(&self, source_id: i64) -> HarvestResult<usize> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE source_id = ?1",
            [source_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use crate::storage::sqlite::SqliteSourceRepository;
    use crate::storage::traits::SourceRepository;
    use chrono::NaiveDate;

    fn setup() -> (SqliteSourceRepository, SqliteArticleRepository) {
        let storage = SqliteStorage::in_memory().unwrap();
        let source_repo = SqliteSourceRepository::new(storage.clone());
        let article_repo = SqliteArticleRepository::new(storage);
        (source_repo, article_repo)
    }

    fn article(link: &str, day: u32) -> Article {
        Article {
            headline: format!("Headline {}", day),
            link: link.to_string(),
            summary: "Summary".to_string(),
            published_at: NaiveDate::from_ymd_opt(2006, 1, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            content: "Body".to_string(),
        }
    }

    #[test]
    fn test_save_and_read_back() {
        let (source_repo, article_repo) = setup();
        let source_id = source_repo.add(&Source::new("https://example.com/feed")).unwrap();

        let saved = article("https://example.com/a", 2);
        assert!(article_repo.save(source_id, &saved).unwrap());

        let recent = article_repo.recent(10).unwrap();
        assert_eq!(recent, vec![saved]);
    }

    #[test]
    fn test_duplicate_link_ignored() {
        let (source_repo, article_repo) = setup();
        let source_id = source_repo.add(&Source::new("https://example.com/feed")).unwrap();

        assert!(article_repo.save(source_id, &article("https://example.com/a", 2)).unwrap());
        assert!(!article_repo.save(source_id, &article("https://example.com/a", 2)).unwrap());
        assert_eq!(article_repo.count_for_source(source_id).unwrap(), 1);
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let (source_repo, article_repo) = setup();
        let source_id = source_repo.add(&Source::new("https://example.com/feed")).unwrap();

        article_repo.save(source_id, &article("https://example.com/a", 2)).unwrap();
        article_repo.save(source_id, &article("https://example.com/c", 4)).unwrap();
        article_repo.save(source_id, &article("https://example.com/b", 3)).unwrap();

        let links: Vec<String> = article_repo
            .recent(2)
            .unwrap()
            .into_iter()
            .map(|a| a.link)
            .collect();
        assert_eq!(links, vec!["https://example.com/c", "https://example.com/b"]);
    }

    #[test]
    fn test_removing_source_drops_its_articles() {
        let (source_repo, article_repo) = setup();
        let source_id = source_repo.add(&Source::new("https://example.com/feed")).unwrap();
        article_repo.save(source_id, &article("https://example.com/a", 2)).unwrap();

        source_repo.remove(source_id).unwrap();

        assert_eq!(article_repo.count_for_source(source_id).unwrap(), 0);
        assert!(article_repo.recent(10).unwrap().is_empty());
    }
}
