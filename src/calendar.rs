//! Trading-date and sample-timestamp parsing.
//!
//! The backend is not consistent about date formats, so several are tried in
//! order. Values that match none of them are kept, never dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date formats seen on the wire, most common first.
const DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d", "%d-%m-%Y", "%d-%b-%Y", "%d%b%Y"];

/// Timestamp formats seen on the wire (RFC 3339 is tried first).
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a trading date in any recognized format.
pub fn parse_trading_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a sample timestamp in any recognized format.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Order trading dates most recent first.
///
/// Unparseable dates keep their relative order after all parsed ones.
pub fn sort_dates_descending(dates: &mut [String]) {
    dates.sort_by(|a, b| match (parse_trading_date(a), parse_trading_date(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_sort_most_recent_first_across_formats() {
        let mut dates = vec![
            "20250228".to_owned(),
            "garbage".to_owned(),
            "2025-03-04".to_owned(),
            "02-Mar-2025".to_owned(),
        ];
        sort_dates_descending(&mut dates);
        assert_eq!(dates, vec!["2025-03-04", "02-Mar-2025", "20250228", "garbage"]);
    }

    #[test]
    fn timestamps_parse_space_and_rfc3339_forms() {
        assert!(parse_timestamp("2025-03-04 09:15:00").is_some());
        assert!(parse_timestamp("2025-03-04T09:15:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
