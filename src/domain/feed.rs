use serde::{Deserialize, Serialize};

use crate::errors::{HarvestError, HarvestResult};

/// Status token a conditional fetch reports when the feed is unchanged
pub const NOT_MODIFIED: &str = "304";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedField {
    Title,
    Status,
    Modified,
}

impl FeedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedField::Title => "title",
            FeedField::Status => "status",
            FeedField::Modified => "modified",
        }
    }
}

/// One level of feed metadata; any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedFields {
    pub title: Option<String>,
    pub status: Option<String>,
    pub modified: Option<String>,
}

impl FeedFields {
    pub fn get(&self, field: FeedField) -> Option<&str> {
        let value = match field {
            FeedField::Title => &self.title,
            FeedField::Status => &self.status,
            FeedField::Modified => &self.modified,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_modified(mut self, modified: impl Into<String>) -> Self {
        self.modified = Some(modified.into());
        self
    }
}

/// One feed item as the feed client produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    pub published_raw: String,
    pub summary: String,
}

impl RawEntry {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published_raw: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_raw: published_raw.into(),
            summary: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

/// Feed as returned by a [`crate::clients::FeedClient`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedFeed {
    /// Collection-level fields (transport response)
    pub response: FeedFields,
    /// Feed-level fields (channel element)
    pub channel: FeedFields,
    pub entries: Vec<RawEntry>,
}

impl FetchedFeed {
    /// Field sets in lookup priority order
    pub fn lookup_order(&self) -> [&FeedFields; 2] {
        [&self.response, &self.channel]
    }

    pub fn lookup(&self, field: FeedField) -> Option<&str> {
        self.lookup_order()
            .into_iter()
            .find_map(|fields| fields.get(field))
    }
}

/// Per-cycle snapshot of the fields the poller needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    pub title: Option<String>,
    pub status: String,
    pub modified: Option<String>,
}

impl FeedMetadata {
    pub fn resolve(feed: &FetchedFeed) -> HarvestResult<Self> {
        let title = feed.lookup(FeedField::Title).map(str::to_string);
        let modified = feed.lookup(FeedField::Modified).map(str::to_string);

        let status = match feed.lookup(FeedField::Status) {
            Some(status) => status.to_string(),
            None => {
                let mut missing = vec![FeedField::Status.as_str()];
                if title.is_none() {
                    missing.insert(0, FeedField::Title.as_str());
                }
                if modified.is_none() {
                    missing.push(FeedField::Modified.as_str());
                }
                return Err(HarvestError::MissingRequiredFeedFields(missing.join(", ")));
            }
        };

        Ok(Self {
            title,
            status,
            modified,
        })
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == NOT_MODIFIED
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled Feed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_fields_take_priority() {
        let feed = FetchedFeed {
            response: FeedFields::default()
                .with_status("200")
                .with_modified("Mon, 02 Jan 2006 15:04:05 GMT"),
            channel: FeedFields::default()
                .with_title("Channel")
                .with_modified("Sun, 01 Jan 2006 00:00:00 GMT"),
            entries: vec![],
        };

        let metadata = FeedMetadata::resolve(&feed).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Channel"));
        assert_eq!(metadata.status, "200");
        assert_eq!(
            metadata.modified.as_deref(),
            Some("Mon, 02 Jan 2006 15:04:05 GMT")
        );
    }

    #[test]
    fn test_falls_back_to_channel_fields() {
        let feed = FetchedFeed {
            response: FeedFields::default(),
            channel: FeedFields::default()
                .with_title("News")
                .with_status("200")
                .with_modified("2006-01-02T15:04:05Z"),
            entries: vec![],
        };

        let metadata = FeedMetadata::resolve(&feed).unwrap();
        assert_eq!(metadata.display_title(), "News");
        assert_eq!(metadata.status, "200");
        assert_eq!(metadata.modified.as_deref(), Some("2006-01-02T15:04:05Z"));
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let feed = FetchedFeed {
            response: FeedFields::default().with_status(""),
            channel: FeedFields::default().with_status("200"),
            entries: vec![],
        };

        assert_eq!(FeedMetadata::resolve(&feed).unwrap().status, "200");
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let feed = FetchedFeed {
            response: FeedFields::default(),
            channel: FeedFields::default().with_title("News"),
            entries: vec![],
        };

        match FeedMetadata::resolve(&feed) {
            Err(HarvestError::MissingRequiredFeedFields(fields)) => {
                assert_eq!(fields, "status, modified");
            }
            other => panic!("expected missing fields error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_fields_missing() {
        match FeedMetadata::resolve(&FetchedFeed::default()) {
            Err(HarvestError::MissingRequiredFeedFields(fields)) => {
                assert_eq!(fields, "title, status, modified");
            }
            other => panic!("expected missing fields error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_modified_status() {
        let feed = FetchedFeed {
            response: FeedFields::default().with_status(NOT_MODIFIED),
            ..Default::default()
        };

        let metadata = FeedMetadata::resolve(&feed).unwrap();
        assert!(metadata.is_not_modified());
        assert_eq!(metadata.display_title(), "Untitled Feed");
    }
}
