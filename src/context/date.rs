//! Date pattern translation for `format_timestamp`
//!
//! Scenario authors write patterns such as `YYYY-MM-DD hh:mm:ss`. The
//! pattern grammar is:
//!
//! | token  | meaning                 | example   |
//! |--------|-------------------------|-----------|
//! | `YYYY` | 4 digit year            | `2020`    |
//! | `YY`   | 2 digit year            | `20`      |
//! | `MMMM` | month name              | `April`   |
//! | `MMM`  | short month name        | `Apr`     |
//! | `MM`   | month, zero padded      | `04`      |
//! | `M`    | month                   | `4`       |
//! | `DDDD` | weekday name            | `Thursday`|
//! | `DDD`  | short weekday name      | `Thu`     |
//! | `DD`   | day, zero padded        | `16`      |
//! | `D`    | day                     | `16`      |
//! | `hh`   | hour, 24h clock         | `21`      |
//! | `h`    | hour, 12h clock, padded | `09`      |
//! | `mm`   | minutes                 | `08`      |
//! | `ss`   | seconds                 | `17`      |
//! | `pm`   | AM/PM marker            | `PM`      |
//! | `ZZZZ` | numeric offset          | `+0200`   |
//! | `ZZZ`  | zone abbreviation       | `CEST`    |
//! | `ZZ`   | offset with colon       | `+02:00`  |
//!
//! Everything else is copied literally.

use chrono::{Local, TimeZone};

/// Tokens in match priority order (longest first within a family)
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%A"),
    ("DDD", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("hh", "%H"),
    ("h", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("pm", "%p"),
    ("ZZZZ", "%z"),
    ("ZZZ", "%Z"),
    ("ZZ", "%:z"),
];

/// Translate a pattern into a chrono `strftime` string
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        for (token, specifier) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(specifier);
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }

    out
}

/// Render a Unix timestamp in local time with a caller pattern.
///
/// The caller grammar uses `HH` for the 24 hour clock and `hh` for the 12
/// hour clock. They are mapped onto the pattern grammar above by rewriting
/// `hh` to `h` first and then `HH` to `hh`.
pub fn format_timestamp(timestamp: i64, pattern: &str) -> Option<String> {
    let pattern = pattern.replace("hh", "h").replace("HH", "hh");
    let datetime = Local.timestamp_opt(timestamp, 0).single()?;
    Some(datetime.format(&to_strftime(&pattern)).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_strftime_tokens() {
        assert_eq!(to_strftime("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(to_strftime("hh:mm:ss"), "%H:%M:%S");
        assert_eq!(to_strftime("h pm"), "%I %p");
        assert_eq!(to_strftime("DDDD, D MMMM YY"), "%A, %-d %B %y");
        assert_eq!(to_strftime("100%"), "100%%");
    }

    #[test]
    fn test_format_timestamp_fixture() {
        let ts = Local
            .with_ymd_and_hms(2020, 4, 16, 21, 8, 17)
            .single()
            .unwrap()
            .timestamp();
        assert_eq!(
            format_timestamp(ts, "YYYY-YY-MM-DD-HH-hh-mm-ss").unwrap(),
            "2020-20-04-16-21-09-08-17"
        );
    }

    #[test]
    fn test_format_timestamp_names() {
        let ts = Local
            .with_ymd_and_hms(2020, 4, 16, 9, 5, 0)
            .single()
            .unwrap()
            .timestamp();
        assert_eq!(format_timestamp(ts, "DDD MMM D").unwrap(), "Thu Apr 16");
    }
}
