//! Human-readable rendering of note timestamps for list cards.

use chrono::{DateTime, Local, TimeZone};

const LAST_UPDATED_FORMAT: &str = "%b %d, %Y %H:%M";

/// Renders `Last updated: MMM dd, yyyy HH:mm` in the local timezone.
pub fn format_last_updated(timestamp_ms: i64) -> String {
    format_last_updated_in(&Local, timestamp_ms)
}

/// Same as [`format_last_updated`] for an explicit timezone.
///
/// Out-of-range timestamps fall back to the raw millisecond value.
pub fn format_last_updated_in<Tz>(tz: &Tz, timestamp_ms: i64) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(utc) => format!(
            "Last updated: {}",
            utc.with_timezone(tz).format(LAST_UPDATED_FORMAT)
        ),
        None => format!("Last updated: {timestamp_ms}"),
    }
}

#[cfg(test)]
mod tests {
    use super::format_last_updated_in;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_utc_timestamp() {
        // 2024-03-05T14:07:00Z
        let rendered = format_last_updated_in(&Utc, 1_709_647_620_000);
        assert_eq!(rendered, "Last updated: Mar 05, 2024 14:07");
    }

    #[test]
    fn applies_timezone_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let rendered = format_last_updated_in(&plus_two, 1_709_647_620_000);
        assert_eq!(rendered, "Last updated: Mar 05, 2024 16:07");
    }
}
