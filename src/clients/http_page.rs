use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::clients::traits::PageFetcher;
use crate::config::Config;
use crate::errors::{HarvestError, HarvestResult};

/// Wait before the first retry; doubles on every further attempt
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Longest a page fetch can take when every attempt runs into `per_attempt`
pub fn retry_budget(per_attempt: Duration, max_retries: u32) -> Duration {
    let attempts = per_attempt.saturating_mul(max_retries.saturating_add(1));
    let backoff = RETRY_BASE_DELAY.saturating_mul(2_u32.saturating_pow(max_retries) - 1);
    attempts.saturating_add(backoff)
}

/// Article page fetcher with bounded retry and exponential backoff
pub struct HttpPageFetcher {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration, max_retries: u32) -> HarvestResult<Self> {
        // Some sites block requests without a browser-like user agent
        if user_agent.trim().is_empty() {
            return Err(HarvestError::Config("user agent must not be empty".to_string()));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            max_retries,
            base_delay: RETRY_BASE_DELAY,
        })
    }

    pub fn from_config(config: &Config) -> HarvestResult<Self> {
        Self::new(&config.user_agent, config.fetch_timeout, config.max_retries)
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    async fn fetch_once(&self, url: &str) -> HarvestResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Network failures, throttling and server errors are worth another try
    fn is_retryable(error: &HarvestError) -> bool {
        match error {
            HarvestError::Http(_) => true,
            HarvestError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> HarvestResult<String> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.max_retries && Self::is_retryable(&e) => {
                    let delay = self.base_delay * 2_u32.pow(attempt);
                    attempt += 1;
                    warn!(%url, attempt, error = %e, ?delay, "Page fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
