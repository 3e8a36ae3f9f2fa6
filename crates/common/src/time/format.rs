//! Human-readable timestamp formatting
//!
//! Server timestamps arrive as ISO-8601 strings, sometimes without a zone
//! designator. Values without one are UTC. Display happens in the
//! `Asia/Phnom_Penh` time zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Phnom_Penh;

const UNKNOWN_LABEL: &str = "Unknown";

/// `Jan 5, 2025, 03:04 PM`
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

const NAIVE_DATE_TIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a server timestamp into UTC
///
/// Accepts RFC 3339 (`Z` or `+07:00`), compact offsets (`+0700`), naive
/// date-times and plain dates. Naive values are taken as UTC; plain dates as
/// UTC midnight.
#[must_use]
pub fn parse_server_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a server timestamp for display in Cambodia time
///
/// Missing or empty input renders as `Unknown`; input that cannot be parsed is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use noteapp_common::time::format::format_cambodia_datetime;
///
/// assert_eq!(format_cambodia_datetime(Some("2025-01-05T08:04:00")), "Jan 5, 2025, 03:04 PM");
/// assert_eq!(format_cambodia_datetime(Some("yesterday")), "yesterday");
/// ```
#[must_use]
pub fn format_cambodia_datetime(input: Option<&str>) -> String {
    let Some(raw) = input.filter(|value| !value.is_empty()) else {
        return UNKNOWN_LABEL.to_string();
    };

    parse_server_timestamp(raw).map_or_else(
        || raw.to_string(),
        |instant| instant.with_timezone(&Phnom_Penh).format(DISPLAY_FORMAT).to_string(),
    )
}
