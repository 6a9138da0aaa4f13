//! Fetch timestamps embedded in persisted snapshot names.
//!
//! Timestamps are rendered as `YYYYMMDDhhmmss` in Taiwan local time
//! (UTC+08:00, no daylight saving), which makes them both human readable
//! and numerically sortable.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt;

const TAIPEI_OFFSET_HOURS: i64 = 8;
const FORMAT: &str = "%Y%m%d%H%M%S";

/// A fetch instant, ordered and compared by its numeric `YYYYMMDDhhmmss` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTimestamp(u64);

impl FetchTimestamp {
    pub const MIN: FetchTimestamp = FetchTimestamp(0);
    pub const MAX: FetchTimestamp = FetchTimestamp(u64::MAX);

    /// The current instant in Taiwan local time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        let local = at.naive_utc() + Duration::hours(TAIPEI_OFFSET_HOURS);
        // Years before 0 clamp to 0; they have no 14-digit form
        let year = u64::try_from(local.year()).unwrap_or(0);
        let date = (year * 100 + u64::from(local.month())) * 100 + u64::from(local.day());
        let time = (u64::from(local.hour()) * 100 + u64::from(local.minute())) * 100
            + u64::from(local.second());
        Self(date * 1_000_000 + time)
    }

    /// Parse the 14-digit form used in snapshot names.
    ///
    /// Returns `None` for anything that is not a valid calendar instant.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDateTime::parse_from_str(s, FORMAT).ok()?;
        s.parse().ok().map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Local calendar date `YYYYMMDD`, used for daily log file names
    pub fn date_part(&self) -> String {
        format!("{:08}", self.0 / 1_000_000)
    }
}

impl fmt::Display for FetchTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:014}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_in_taipei_time() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 16, 30, 5).unwrap();
        let ts = FetchTimestamp::from_datetime(utc);
        assert_eq!(ts.to_string(), "20240116003005");
        assert_eq!(ts.date_part(), "20240116");
    }

    #[test]
    fn test_from_datetime_matches_rendered_digits() {
        let utc = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let ts = FetchTimestamp::from_datetime(utc);
        assert_eq!(ts.value(), 20240101075959);
        assert_eq!(FetchTimestamp::parse(&ts.to_string()), Some(ts));
    }

    #[test]
    fn test_parse_round_trip() {
        let ts = FetchTimestamp::parse("20240101093000").unwrap();
        assert_eq!(ts.value(), 20240101093000);
        assert_eq!(ts.to_string(), "20240101093000");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(FetchTimestamp::parse("2024010109300").is_none());
        assert!(FetchTimestamp::parse("2024010109300x").is_none());
        assert!(FetchTimestamp::parse("20241301093000").is_none());
        assert!(FetchTimestamp::parse("").is_none());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let a = FetchTimestamp::parse("20231231235959").unwrap();
        let b = FetchTimestamp::parse("20240101000000").unwrap();
        assert!(a < b);
    }
}
