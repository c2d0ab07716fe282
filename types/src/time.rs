//! Clock abstraction used to timestamp donations.
//!
//! Timestamps are written into records as RFC 3339 strings in UTC.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current time formatted for a donation record.
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Format a UTC instant as RFC 3339 with second precision (`2024-05-01T12:00:00Z`).
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format Unix epoch seconds as RFC 3339. Out-of-range values render as `-`.
pub fn format_unix_secs(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| Utc.timestamp_opt(s, 0).single())
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string())
}
