//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds since the Unix epoch, as carried in `createdAt` message fields.
#[must_use]
pub fn unix_timestamp() -> i64 {
    now().timestamp()
}
