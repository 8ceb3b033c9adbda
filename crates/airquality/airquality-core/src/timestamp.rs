//! Timestamp parsing for the fixed `YYYY-MM-DD HH:MM` format.
//!
//! Timestamps without an offset are taken as UTC. An explicit offset
//! (`+05:30`, `+0530` or a trailing `Z`) is honored and converted to UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Fixed date-time format for input rows and queries
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M%:z", "%Y-%m-%d %H:%M%z"];

/// Parse a timestamp into a UTC instant, or `None` if it does not match
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Some(naive) = input.strip_suffix('Z') {
        return parse_naive(naive);
    }
    if let Some(parsed) = parse_naive(input) {
        return Some(parsed);
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(input, format).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a UTC instant in the fixed format
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_naive(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input.trim_end(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_format_as_utc() {
        let parsed = parse_timestamp("2024-03-15 07:45").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 15, 7, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_with_offset_converts_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 2, 15, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-15 07:45+05:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-15 07:45+0530"), Some(expected));
    }

    #[test]
    fn test_parse_with_z_suffix() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 7, 45, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-15 07:45Z"), Some(expected));
    }

    #[test]
    fn test_rejects_other_formats() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-03-15"), None);
        assert_eq!(parse_timestamp("2024-03-15T07:45"), None);
        assert_eq!(parse_timestamp("2024-03-15 07:45:00"), None);
        assert_eq!(parse_timestamp("2024-13-15 07:45"), None);
        assert_eq!(parse_timestamp("2024-02-30 07:45"), None);
    }

    #[test]
    fn test_format_round_trip() {
        let ts = Utc.with_ymd_and_hms(2020, 11, 25, 1, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2020-11-25 01:00");
        assert_eq!(parse_timestamp(&format_timestamp(&ts)), Some(ts));
    }
}
