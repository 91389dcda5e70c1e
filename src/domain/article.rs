use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::RawEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub headline: String,
    pub link: String,
    pub summary: String,
    pub published_at: NaiveDateTime,
    pub content: String,
}

impl Article {
    /// Build the enriched article for a feed entry and its extracted body
    pub fn from_entry(entry: &RawEntry, published_at: NaiveDateTime, content: String) -> Self {
        Self {
            headline: entry.title.clone(),
            link: entry.link.clone(),
            summary: entry.summary.clone(),
            published_at,
            content,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}
