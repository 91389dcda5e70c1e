use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::{RawEntry, Watermark};
use crate::errors::HarvestResult;
use crate::freshness::timestamp;

/// A feed entry that passed the freshness check, with its parsed timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub entry: &'a RawEntry,
    pub published_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Stop at the first entry that is not newer than the watermark
    EarlyStop,
    /// Skip non-new entries and keep going
    Full,
}

/// How much the poller trusts a feed's newest-first ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Always stop at the first entry that is not new
    Trust,
    /// Check the ordering first and scan the whole feed when it is violated
    #[default]
    Verify,
}

impl OrderingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::Trust => "trust",
            OrderingPolicy::Verify => "verify",
        }
    }
}

impl std::str::FromStr for OrderingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trust" => Ok(OrderingPolicy::Trust),
            "verify" => Ok(OrderingPolicy::Verify),
            _ => Err(format!("Unknown ordering policy: {}", s)),
        }
    }
}

/// Lazy sequence of new entries. Consumed once; it does not restart.
#[derive(Debug)]
pub struct Fresh<'a> {
    entries: std::slice::Iter<'a, RawEntry>,
    watermark: Option<NaiveDateTime>,
    scan: Scan,
    exhausted: bool,
}

impl<'a> Fresh<'a> {
    fn new(entries: &'a [RawEntry], watermark: &Watermark, scan: Scan) -> HarvestResult<Self> {
        Ok(Self {
            entries: entries.iter(),
            watermark: watermark.instant()?,
            scan,
            exhausted: false,
        })
    }
}

impl<'a> Iterator for Fresh<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        for entry in self.entries.by_ref() {
            let published_at = match timestamp::parse(&entry.published_raw) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(link = %entry.link, error = %e, "Dropping entry with unreadable date");
                    continue;
                }
            };

            let is_new = match self.watermark {
                None => true,
                Some(watermark) => timestamp::is_newer(published_at, watermark),
            };

            if is_new {
                return Some(Candidate {
                    entry,
                    published_at,
                });
            }

            if self.scan == Scan::EarlyStop {
                // Newest-first feed: everything after this one is older too
                break;
            }
        }

        self.exhausted = true;
        None
    }
}

/// Entries newer than `watermark`, assuming the feed is newest-first.
///
/// With [`Watermark::Never`] every entry with a readable date is yielded.
/// Otherwise iteration ends at the first entry that is not strictly newer.
/// Entries whose date cannot be parsed are dropped with a warning. Fails only
/// when the watermark token itself is unreadable.
pub fn select<'a>(entries: &'a [RawEntry], watermark: &Watermark) -> HarvestResult<Fresh<'a>> {
    Fresh::new(entries, watermark, Scan::EarlyStop)
}

/// Like [`select`] but examines every entry, for feeds that are out of order.
pub fn select_full_scan<'a>(
    entries: &'a [RawEntry],
    watermark: &Watermark,
) -> HarvestResult<Fresh<'a>> {
    Fresh::new(entries, watermark, Scan::Full)
}

/// Whether the readable entry dates never increase in feed order
pub fn is_reverse_chronological(entries: &[RawEntry]) -> bool {
    let mut previous: Option<NaiveDateTime> = None;

    for entry in entries {
        let Ok(current) = timestamp::parse(&entry.published_raw) else {
            continue;
        };
        if previous.is_some_and(|prev| current > prev) {
            return false;
        }
        previous = Some(current);
    }

    true
}
