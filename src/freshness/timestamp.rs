use chrono::{DateTime, NaiveDateTime, Weekday};

use crate::errors::{HarvestError, HarvestResult};

/// RFC-822 layout with a numeric offset, used when re-serializing dates
pub const RFC822_NUMERIC: &str = "%a, %d %b %Y %H:%M:%S %z";

// Parsed after the `Www, ` prefix has been removed
const RFC822_DATE_NUMERIC: &str = "%d %b %Y %H:%M:%S %z";
const RFC822_DATE_NO_ZONE: &str = "%d %b %Y %H:%M:%S";
const ISO8601_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `Mon, 02 Jan 2006 15:04:05 +0000`
    Rfc822Numeric,
    /// `Mon, 02 Jan 2006 15:04:05 GMT`
    Rfc822Named,
    /// `2006-01-02T15:04:05Z`
    Iso8601Utc,
}

/// Recognized formats, tried in order
pub const FORMATS: [TimeFormat; 3] = [
    TimeFormat::Rfc822Numeric,
    TimeFormat::Rfc822Named,
    TimeFormat::Iso8601Utc,
];

impl TimeFormat {
    /// Parse `raw` as this format, dropping any zone information
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            TimeFormat::Rfc822Numeric => {
                DateTime::parse_from_str(without_weekday(raw)?, RFC822_DATE_NUMERIC)
                    .ok()
                    .map(|dt| dt.naive_local())
            }
            TimeFormat::Rfc822Named => {
                let (stamp, zone) = without_weekday(raw)?.rsplit_once(' ')?;
                if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                NaiveDateTime::parse_from_str(stamp.trim_end(), RFC822_DATE_NO_ZONE).ok()
            }
            TimeFormat::Iso8601Utc => NaiveDateTime::parse_from_str(raw, ISO8601_UTC).ok(),
        }
    }
}

/// Date part of an RFC-822 stamp, after its `Www, ` prefix.
///
/// The prefix must name a weekday; it is not checked against the date.
fn without_weekday(raw: &str) -> Option<&str> {
    let (day, rest) = raw.split_once(", ")?;
    day.parse::<Weekday>().ok()?;
    Some(rest.trim_start())
}

/// Normalize a feed date string to a naive wall-clock instant.
///
/// The first format in [`FORMATS`] that accepts the string wins. Zone
/// offsets are discarded, not applied, so values are compared as written.
pub fn parse(raw: &str) -> HarvestResult<NaiveDateTime> {
    let trimmed = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| format.parse(trimmed))
        .ok_or_else(|| HarvestError::UnsupportedTimeFormat(raw.to_string()))
}

/// Only strictly later instants count as new; ties are already seen.
pub fn is_newer(candidate: NaiveDateTime, watermark: NaiveDateTime) -> bool {
    candidate > watermark
}
