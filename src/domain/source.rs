use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::HarvestResult;
use crate::freshness::timestamp;

/// Latest last-modified token known to be fully processed for a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Watermark {
    /// No successful poll yet; every entry counts as new.
    #[default]
    Never,
    At(String),
}

impl Watermark {
    pub fn at(token: impl Into<String>) -> Self {
        Watermark::At(token.into())
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Watermark::Never => None,
            Watermark::At(token) => Some(token),
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Watermark::Never)
    }

    /// Normalized instant of the token, `None` for the never-polled sentinel
    pub fn instant(&self) -> HarvestResult<Option<NaiveDateTime>> {
        self.token().map(timestamp::parse).transpose()
    }
}

impl From<Option<String>> for Watermark {
    fn from(token: Option<String>) -> Self {
        token.map(Watermark::At).unwrap_or_default()
    }
}

impl std::fmt::Display for Watermark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Watermark::Never => write!(f, "never"),
            Watermark::At(token) => write!(f, "{}", token),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: Option<i64>,
    pub url: String,
    pub watermark: Watermark,
    pub created_at: Option<String>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            watermark: Watermark::Never,
            created_at: None,
        }
    }

    pub fn with_watermark(mut self, watermark: Watermark) -> Self {
        self.watermark = watermark;
        self
    }
}
