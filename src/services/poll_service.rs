use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clients::http_page::retry_budget;
use crate::clients::{FeedClient, PageFetcher};
use crate::config::Config;
use crate::domain::{Article, FeedMetadata, RawEntry, Source, Watermark};
use crate::errors::{HarvestError, HarvestResult};
use crate::extraction::AdapterRegistry;
use crate::freshness::{self, Fresh, OrderingPolicy};

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Sources polled at the same time
    pub concurrency: usize,
    /// Hard limit for a single article page fetch, retries included
    pub fetch_timeout: Duration,
    pub ordering: OrderingPolicy,
}

impl PollOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency,
            fetch_timeout: retry_budget(config.fetch_timeout, config.max_retries),
            ordering: config.ordering,
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fetch_timeout: Duration::from_secs(30),
            ordering: OrderingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Feed was read and new entries (possibly none) were harvested
    Fetched,
    /// Feed reported no change since the previous cycle
    Unmodified,
    Skipped(String),
    Cancelled,
}

impl std::fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceOutcome::Fetched => write!(f, "fetched"),
            SourceOutcome::Unmodified => write!(f, "unmodified"),
            SourceOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            SourceOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of polling one source during a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub url: String,
    pub outcome: SourceOutcome,
    pub articles: Vec<Article>,
    /// Watermark the caller should store for the next cycle
    pub watermark: Watermark,
}

impl SourceReport {
    fn unchanged(source: &Source, outcome: SourceOutcome) -> Self {
        Self {
            url: source.url.clone(),
            outcome,
            articles: Vec::new(),
            watermark: source.watermark.clone(),
        }
    }

    fn skipped(source: &Source, error: &HarvestError) -> Self {
        Self::unchanged(source, SourceOutcome::Skipped(error.to_string()))
    }

    fn cancelled(source: &Source) -> Self {
        Self::unchanged(source, SourceOutcome::Cancelled)
    }
}

/// Reports of one poll cycle, in the same order as the polled sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleResult {
    pub reports: Vec<SourceReport>,
}

impl CycleResult {
    pub fn articles_per_source(&self) -> Vec<&[Article]> {
        self.reports.iter().map(|r| r.articles.as_slice()).collect()
    }

    pub fn watermarks(&self) -> Vec<&Watermark> {
        self.reports.iter().map(|r| &r.watermark).collect()
    }

    pub fn article_count(&self) -> usize {
        self.reports.iter().map(|r| r.articles.len()).sum()
    }

    pub fn into_parts(self) -> (Vec<Vec<Article>>, Vec<Watermark>) {
        self.reports
            .into_iter()
            .map(|r| (r.articles, r.watermark))
            .unzip()
    }
}

pub struct PollService<F: FeedClient, P: PageFetcher> {
    feed_client: F,
    page_fetcher: P,
    registry: AdapterRegistry,
    options: PollOptions,
}

impl<F: FeedClient, P: PageFetcher> PollService<F, P> {
    pub fn new(feed_client: F, page_fetcher: P, registry: AdapterRegistry, options: PollOptions) -> Self {
        Self {
            feed_client,
            page_fetcher,
            registry,
            options,
        }
    }

    /// Poll every source once. Never fails; problems are reported per source.
    pub async fn poll_cycle(&self, sources: &[Source]) -> CycleResult {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.poll_cycle_with_shutdown(sources, shutdown_rx).await
    }

    /// Poll every source once, stopping early when `shutdown` turns true.
    ///
    /// Sources that had not finished when shutdown was signalled report
    /// [`SourceOutcome::Cancelled`] and keep their prior watermark.
    pub async fn poll_cycle_with_shutdown(
        &self,
        sources: &[Source],
        shutdown: watch::Receiver<bool>,
    ) -> CycleResult {
        let reports = stream::iter(sources)
            .map(|source| {
                let mut shutdown = shutdown.clone();
                async move {
                    if *shutdown.borrow() {
                        return SourceReport::cancelled(source);
                    }

                    tokio::select! {
                        report = self.poll_source(source) => report,
                        _ = wait_for_shutdown(&mut shutdown) => {
                            warn!(url = %source.url, "Poll cancelled");
                            SourceReport::cancelled(source)
                        }
                    }
                }
            })
            .buffered(self.options.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let result = CycleResult { reports };
        info!(
            sources = sources.len(),
            articles = result.article_count(),
            "Poll cycle finished"
        );
        result
    }

    /// Poll a single source against its stored watermark
    pub async fn poll_source(&self, source: &Source) -> SourceReport {
        let feed = match self
            .feed_client
            .fetch_feed(&source.url, &source.watermark)
            .await
        {
            Ok(feed) => feed,
            Err(e) => {
                warn!(url = %source.url, error = %e, "Feed fetch failed, skipping source");
                return SourceReport::skipped(source, &e);
            }
        };

        let metadata = match FeedMetadata::resolve(&feed) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(url = %source.url, error = %e, "Skipping source");
                return SourceReport::skipped(source, &e);
            }
        };

        let watermark = next_watermark(&source.url, &source.watermark, &metadata);

        let same_token = metadata.modified.is_some()
            && metadata.modified.as_deref() == source.watermark.token();
        if same_token || metadata.is_not_modified() {
            info!(url = %source.url, title = metadata.display_title(), "Source unmodified");
            return SourceReport {
                url: source.url.clone(),
                outcome: SourceOutcome::Unmodified,
                articles: Vec::new(),
                watermark,
            };
        }

        let fresh = match self.select_fresh(&source.url, &feed.entries, &source.watermark) {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(url = %source.url, error = %e, "Stored watermark unreadable, skipping source");
                return SourceReport::skipped(source, &e);
            }
        };

        let mut articles = Vec::new();
        for candidate in fresh {
            let content = self.fetch_content(&candidate.entry.link).await;
            articles.push(Article::from_entry(
                candidate.entry,
                candidate.published_at,
                content,
            ));
        }

        info!(
            url = %source.url,
            title = metadata.display_title(),
            new_articles = articles.len(),
            watermark = %watermark,
            "Source polled"
        );

        SourceReport {
            url: source.url.clone(),
            outcome: SourceOutcome::Fetched,
            articles,
            watermark,
        }
    }

    fn select_fresh<'a>(
        &self,
        url: &str,
        entries: &'a [RawEntry],
        watermark: &Watermark,
    ) -> HarvestResult<Fresh<'a>> {
        match self.options.ordering {
            OrderingPolicy::Verify
                if !watermark.is_never() && !freshness::is_reverse_chronological(entries) =>
            {
                warn!(%url, "Feed entries are not newest-first, scanning all entries");
                freshness::select_full_scan(entries, watermark)
            }
            _ => freshness::select(entries, watermark),
        }
    }

    /// Fetch an entry's page and extract its body; failures leave it empty
    async fn fetch_content(&self, link: &str) -> String {
        let fetch = self.page_fetcher.fetch_page(link);

        let html = match tokio::time::timeout(self.options.fetch_timeout, fetch).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => {
                warn!(%link, error = %e, "Page fetch failed, keeping article without content");
                return String::new();
            }
            Err(_) => {
                let e = HarvestError::Timeout(link.to_string());
                warn!(%link, error = %e, "Page fetch failed, keeping article without content");
                return String::new();
            }
        };

        debug!(%link, bytes = html.len(), "Page fetched");
        self.registry.extract_body(&html)
    }
}

/// Watermark to carry forward: the feed's modified token unless it would move backwards
fn next_watermark(url: &str, prior: &Watermark, metadata: &FeedMetadata) -> Watermark {
    let Some(modified) = metadata.modified.as_deref() else {
        return prior.clone();
    };
    let candidate = Watermark::at(modified);

    match (prior.instant(), candidate.instant()) {
        (_, Err(e)) => {
            warn!(%url, error = %e, "Unreadable modified token, keeping previous watermark");
            prior.clone()
        }
        (Ok(Some(prior_at)), Ok(Some(candidate_at))) if candidate_at < prior_at => {
            warn!(%url, %prior, %candidate, "Feed went back in time, keeping previous watermark");
            prior.clone()
        }
        _ => candidate,
    }
}

/// Resolves once the flag is set; never resolves if the sender is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
