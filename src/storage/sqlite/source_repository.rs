use rusqlite::Row;

use crate::domain::{Source, Watermark};
use crate::errors::{HarvestError, HarvestResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::SourceRepository;

const SELECT_SOURCE: &str = "SELECT id, url, watermark, created_at FROM sources";

pub struct SqliteSourceRepository {
    storage: SqliteStorage,
}

impl SqliteSourceRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Source> {
        let watermark: Option<String> = row.get(2)?;

        Ok(Source {
            id: Some(row.get(0)?),
            url: row.get(1)?,
            watermark: Watermark::from(watermark),
            created_at: row.get(3)?,
        })
    }

    fn query_one(&self, clause: &str, param: &dyn rusqlite::ToSql) -> HarvestResult<Option<Source>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("{} {}", SELECT_SOURCE, clause))?;

        match stmt.query_row([param], Self::map_row) {
            Ok(source) => Ok(Some(source)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(HarvestError::from(e)),
        }
    }
}

impl SourceRepository for SqliteSourceRepository {
    fn add(&self, source: &Source) -> HarvestResult<i64> {
        let conn = self.storage.connection()?;

        // Check if already exists (within the same connection to avoid deadlock)
        let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM sources WHERE url = ?1)")?;
        let exists: bool = stmt.query_row([&source.url], |row| row.get(0))?;
        drop(stmt);

        if exists {
            return Err(HarvestError::SourceAlreadyExists(source.url.clone()));
        }

        conn.execute(
            "INSERT INTO sources (url, watermark) VALUES (?1, ?2)",
            (&source.url, source.watermark.token()),
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn remove(&self, id: i64) -> HarvestResult<()> {
        let conn = self.storage.connection()?;
        conn.execute("DELETE FROM sources WHERE id = ?1", [id])?;
        Ok(())
    }

    fn get_all(&self) -> HarvestResult<Vec<Source>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_SOURCE))?;
        let sources = stmt.query_map([], Self::map_row)?;

        sources.collect::<Result<Vec<_>, _>>().map_err(HarvestError::from)
    }

    fn get_by_id(&self, id: i64) -> HarvestResult<Option<Source>> {
        self.query_one("WHERE id = ?1", &id)
    }

    fn exists(&self, url: &str) -> HarvestResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM sources WHERE url = ?1)")?;
        let exists: bool = stmt.query_row([url], |row| row.get(0))?;
        Ok(exists)
    }

    fn update_watermark(&self, url: &str, watermark: &Watermark) -> HarvestResult<()> {
        let conn = self.storage.connection()?;
        let changed = conn.execute(
            "UPDATE sources SET watermark = ?1, updated_at = datetime('now') WHERE url = ?2",
            (watermark.token(), url),
        )?;

        if changed == 0 {
            return Err(HarvestError::SourceNotFound(url.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> SqliteSourceRepository {
        let storage = SqliteStorage::in_memory().unwrap();
        SqliteSourceRepository::new(storage)
    }

    #[test]
    fn test_add_and_get_source() {
        let repo = setup_repo();
        let source = Source::new("https://example.com/feed");

        let id = repo.add(&source).unwrap();
        assert!(id > 0);

        let retrieved = repo.get_by_id(id).unwrap().unwrap();
        assert_eq!(retrieved.url, "https://example.com/feed");
        assert_eq!(retrieved.watermark, Watermark::Never);
        assert!(retrieved.created_at.is_some());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let repo = setup_repo();
        let source = Source::new("https://example.com/feed");

        repo.add(&source).unwrap();
        let result = repo.add(&source);

        assert!(matches!(result, Err(HarvestError::SourceAlreadyExists(_))));
    }

    #[test]
    fn test_remove_source() {
        let repo = setup_repo();
        let id = repo.add(&Source::new("https://example.com/feed")).unwrap();

        repo.remove(id).unwrap();

        assert!(repo.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn test_get_all_keeps_insertion_order() {
        let repo = setup_repo();

        repo.add(&Source::new("https://b.example.com/feed")).unwrap();
        repo.add(&Source::new("https://a.example.com/feed")).unwrap();
        repo.add(&Source::new("https://c.example.com/feed")).unwrap();

        let urls: Vec<String> = repo.get_all().unwrap().into_iter().map(|s| s.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://b.example.com/feed",
                "https://a.example.com/feed",
                "https://c.example.com/feed",
            ]
        );
    }

    #[test]
    fn test_exists() {
        let repo = setup_repo();

        assert!(!repo.exists("https://example.com/feed").unwrap());
        repo.add(&Source::new("https://example.com/feed")).unwrap();
        assert!(repo.exists("https://example.com/feed").unwrap());
    }

    #[test]
    fn test_update_watermark() {
        let repo = setup_repo();
        repo.add(&Source::new("https://example.com/feed")).unwrap();

        let watermark = Watermark::at("Tue, 03 Jan 2006 10:00:00 GMT");
        repo.update_watermark("https://example.com/feed", &watermark)
            .unwrap();

        let source = repo.get_all().unwrap().remove(0);
        assert_eq!(source.watermark, watermark);
    }

    #[test]
    fn test_update_watermark_unknown_source() {
        let repo = setup_repo();
        let result = repo.update_watermark("https://missing.example.com", &Watermark::Never);

        assert!(matches!(result, Err(HarvestError::SourceNotFound(_))));
    }

    #[test]
    fn test_add_with_existing_watermark() {
        let repo = setup_repo();
        let source = Source::new("https://example.com/feed")
            .with_watermark(Watermark::at("2006-01-02T15:04:05Z"));

        repo.add(&source).unwrap();

        let stored = repo.get_all().unwrap().remove(0);
        assert_eq!(stored.watermark.token(), Some("2006-01-02T15:04:05Z"));
    }
}
