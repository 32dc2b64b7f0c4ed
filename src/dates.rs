//! Header date parsing
//!
//! Usenet servers and posting agents write dates in many shapes. The parser
//! tries RFC 2822 first, then the common deviations, then RFC 3339, and
//! finally zone-less timestamps which are taken to be UTC.

use crate::error::{NntpError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Zone-less layouts seen in the wild, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Zone names chrono's RFC 2822 parser does not know, mapped to an offset
const ZONE_ALIASES: &[(&str, &str)] = &[(" UTC", " +0000"), (" Z", " +0000")];

/// Parse a Date or NNTP-Posting-Date header value into UTC
///
/// # Examples
///
/// ```
/// use nntp_scanner::dates::parse_header_date;
///
/// let dt = parse_header_date("Mon, 01 Jan 2024 10:00:00 +0100 (CET)").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2024-01-01T09:00:00+00:00");
///
/// let naive = parse_header_date("2024-01-01 10:00:00").unwrap();
/// assert_eq!(naive.to_rfc3339(), "2024-01-01T10:00:00+00:00");
/// ```
///
/// # Errors
///
/// Returns [`NntpError::InvalidResponse`] when no supported layout matches.
pub fn parse_header_date(value: &str) -> Result<DateTime<Utc>> {
    let cleaned = strip_comment(value.trim());

    if let Ok(dt) = DateTime::parse_from_rfc2822(cleaned) {
        return Ok(dt.with_timezone(&Utc));
    }

    for (alias, offset) in ZONE_ALIASES {
        if let Some(stem) = cleaned.strip_suffix(alias) {
            let normalized = format!("{}{}", stem, offset);
            if let Ok(dt) = DateTime::parse_from_rfc2822(&normalized) {
                return Ok(dt.with_timezone(&Utc));
            }
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(NntpError::InvalidResponse(format!(
        "Invalid date format: {}",
        value.chars().take(100).collect::<String>()
    )))
}

/// Drop a trailing parenthesised comment such as "(UTC)" or "(CET)"
fn strip_comment(value: &str) -> &str {
    if value.ends_with(')') {
        if let Some(open) = value.rfind('(') {
            return value[..open].trim_end();
        }
    }
    value
}
