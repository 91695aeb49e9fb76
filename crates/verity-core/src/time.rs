//! Time utilities for certificate validity windows.

use chrono::{DateTime, Utc};

/// Absolute instant used for validity bounds and clock readings.
pub type Timestamp = DateTime<Utc>;

/// The latest representable instant.
///
/// A default-constructed certificate uses this as `not_before`, so an
/// unpopulated validity interval is empty rather than infinite.
pub fn timestamp_max() -> Timestamp {
    DateTime::<Utc>::MAX_UTC
}

/// The earliest representable instant, used as the unset `not_after`.
pub fn timestamp_min() -> Timestamp {
    DateTime::<Utc>::MIN_UTC
}

/// Clamp a timestamp to whole-second resolution.
///
/// Validity windows travel as second-granular wire timestamps, so every
/// bound entering the certificate model passes through this.
pub fn truncate_to_seconds(timestamp: Timestamp) -> Timestamp {
    use chrono::Timelike;
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
