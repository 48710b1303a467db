//! Cookie and timestamp helpers.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Parse a `Cookie`-style header (`a=1; b=2`) into a map.
///
/// Pairs split on the first `=`; a pair without one maps to an empty value.
/// A later duplicate name overwrites an earlier one.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    parse_cookies(header).remove(name)
}

/// Calendar fields of a timestamp, zero-padded to two digits where the UI
/// shows them that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParts {
    pub year: i32,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
}

impl TimeParts {
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            year: dt.year(),
            month: pad(dt.month()),
            day: pad(dt.day()),
            hour: pad(dt.hour()),
            minute: pad(dt.minute()),
            second: pad(dt.second()),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }
}

fn pad(value: u32) -> String {
    format!("{value:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parses_cookie_header() {
        let cookies = parse_cookies("__session=abc; theme=dark ;flag");
        assert_eq!(cookies.get("__session").map(String::as_str), Some("abc"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(cookies.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn value_keeps_embedded_equals() {
        assert_eq!(cookie_value("__session=YWJj==", "__session").as_deref(), Some("YWJj=="));
    }

    #[test]
    fn empty_header_has_no_cookies() {
        assert!(parse_cookies("").is_empty());
        assert_eq!(cookie_value("", "x"), None);
    }

    #[test]
    fn later_duplicate_wins() {
        assert_eq!(cookie_value("a=1; a=2", "a").as_deref(), Some("2"));
    }

    #[test]
    fn time_parts_are_padded() {
        let dt = Utc.with_ymd_and_hms(2020, 3, 7, 9, 5, 1).unwrap();
        let parts = TimeParts::from_datetime(&dt);
        assert_eq!(
            parts,
            TimeParts {
                year: 2020,
                month: "03".to_string(),
                day: "07".to_string(),
                hour: "09".to_string(),
                minute: "05".to_string(),
                second: "01".to_string(),
            }
        );
    }

    #[test]
    fn two_digit_fields_are_unchanged() {
        let dt = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        let parts = TimeParts::from_datetime(&dt);
        assert_eq!(parts.month, "12");
        assert_eq!(parts.second, "58");
    }
}
