use chrono::{DateTime, TimeZone, Utc};
use std::time::Instant;

/// Broker timestamps are milliseconds since the Unix epoch; 0 means unset.
pub fn millis_to_utc(millis: u64) -> Option<DateTime<Utc>> {
    if millis == 0 {
        return None;
    }
    let millis = i64::try_from(millis).ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
