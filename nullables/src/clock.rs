//! Nullable clock — deterministic time for testing.

use std::sync::Mutex;

use charity_types::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Mutex<DateTime<Utc>>,
}

impl NullClock {
    /// Start the clock at `initial_secs` seconds after the Unix epoch.
    pub fn new(initial_secs: i64) -> Self {
        let start = Utc
            .timestamp_opt(initial_secs, 0)
            .single()
            .unwrap_or_else(|| panic!("timestamp {initial_secs} out of range"));
        Self {
            current: Mutex::new(start),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: i64) {
        let mut now = self.current.lock().unwrap();
        *now += Duration::seconds(secs);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: i64) {
        *self.current.lock().unwrap() = Utc.timestamp_opt(secs, 0).single().unwrap();
    }
}

impl Clock for NullClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap()
    }
}
