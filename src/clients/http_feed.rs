use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::parser;
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::clients::traits::FeedClient;
use crate::config::Config;
use crate::domain::{FeedFields, FetchedFeed, RawEntry, Watermark};
use crate::errors::{HarvestError, HarvestResult};
use crate::freshness::timestamp::RFC822_NUMERIC;

/// Feed client over HTTP with conditional GET, parsing RSS/Atom/JSON Feed
pub struct HttpFeedClient {
    client: Client,
}

impl HttpFeedClient {
    pub fn new(user_agent: &str, timeout: Duration) -> HarvestResult<Self> {
        if user_agent.trim().is_empty() {
            return Err(HarvestError::Config("user agent must not be empty".to_string()));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> HarvestResult<Self> {
        Self::new(&config.user_agent, config.fetch_timeout)
    }

    /// Parse feed bytes into entries, keeping the response-level fields
    fn parse_feed(response: FeedFields, bytes: &[u8]) -> HarvestResult<FetchedFeed> {
        let parsed = parser::parse(bytes).map_err(|e| HarvestError::FeedParse(e.to_string()))?;

        let channel = FeedFields {
            title: parsed.title.map(|t| t.content),
            status: None,
            modified: parsed.updated.map(format_instant),
        };

        let entries = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());

                let link = entry
                    .links
                    .into_iter()
                    .next()
                    .map(|l| l.href)
                    .unwrap_or_default();

                let published_raw = entry
                    .published
                    .or(entry.updated)
                    .map(format_instant)
                    .unwrap_or_default();

                let summary = entry.summary.map(|s| s.content).unwrap_or_default();

                RawEntry::new(title, link, published_raw).with_summary(summary)
            })
            .collect();

        Ok(FetchedFeed {
            response,
            channel,
            entries,
        })
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format(RFC822_NUMERIC).to_string()
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_feed(&self, url: &str, since: &Watermark) -> HarvestResult<FetchedFeed> {
        let mut request = self.client.get(url);
        if let Some(token) = since.token() {
            request = request.header(IF_MODIFIED_SINCE, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let fields = FeedFields {
            title: None,
            status: Some(status.as_u16().to_string()),
            modified: last_modified,
        };

        if status == StatusCode::NOT_MODIFIED {
            debug!(%url, "Feed not modified since last poll");
            return Ok(FetchedFeed {
                response: fields,
                ..Default::default()
            });
        }

        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Self::parse_feed(fields, &bytes)
    }
}
