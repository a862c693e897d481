//! Timestamp parsing for extracted publication dates
//!
//! Tries the recognized format set in order and returns the first
//! successful parse; the caller falls back to a zero instant otherwise
//! (property 7: round-tripping any recognized format is lossless to its
//! resolution).

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S",
];

/// The sentinel "zero" instant used when no candidate string parses.
#[must_use]
pub fn zero_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(0, 0).expect("unix epoch is representable")
}

/// Parse `s` against RFC3339 first, then the Go-flavored layouts the
/// original selector contract names.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    None
}

/// Try each candidate in order, returning the first that parses.
#[must_use]
pub fn first_parseable(candidates: &[Option<String>]) -> DateTime<Utc> {
    candidates
        .iter()
        .flatten()
        .find_map(|c| parse_timestamp(c))
        .unwrap_or_else(zero_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let parsed = parse_timestamp("2025-02-11T17:37:42Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-02-11T17:37:42+00:00");
    }

    #[test]
    fn parses_space_separated() {
        assert!(parse_timestamp("2025-02-11 17:37:42").is_some());
    }

    #[test]
    fn unparseable_candidates_fall_back_to_zero() {
        let candidates = vec![Some("not a date".to_string()), None];
        assert_eq!(first_parseable(&candidates), zero_time());
    }

    #[test]
    fn first_success_wins() {
        let candidates = vec![
            Some("garbage".to_string()),
            Some("2025-02-11T17:37:42Z".to_string()),
            Some("2025-01-01T00:00:00Z".to_string()),
        ];
        let parsed = first_parseable(&candidates);
        assert_eq!(parsed.to_rfc3339(), "2025-02-11T17:37:42+00:00");
    }
}
