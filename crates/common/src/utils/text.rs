//! Formatting helpers for table rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder printed for missing or unparsable dates.
pub const NO_DATE: &str = "-";

/// `#` followed by the first six characters of an id.
pub fn short_id(id: &str) -> String {
    format!("#{}", prefix(id, 6))
}

/// First `n` characters of `s` (char boundary safe).
pub fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate to `max` characters, appending `...` when anything was cut.
pub fn truncate(s: &str, max: usize) -> String {
    let head = prefix(s, max);
    if head.len() < s.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `19 Oct 2026`, or `-` when the input is absent or unparsable.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// `19 Oct 2026, 02:30 pm`, or `-`.
pub fn format_date_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%d %b %Y, %I:%M %P").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Sort key for newest-first ordering; unparsable dates sort last.
pub fn timestamp_key(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_takes_six_chars() {
        assert_eq!(short_id("a1b2c3d4e5"), "#a1b2c3");
        assert_eq!(short_id("abc"), "#abc");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("héllo wörld", 4), "héll...");
    }

    #[test]
    fn dates_format_or_dash() {
        assert_eq!(format_date(Some("2026-10-19T08:15:00Z")), "19 Oct 2026");
        assert_eq!(format_date(Some("2026-10-19T08:15:00.123456")), "19 Oct 2026");
        assert_eq!(format_date(Some("2026-01-02")), "02 Jan 2026");
        assert_eq!(format_date(Some("not a date")), "-");
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date_time(Some("2026-10-19T14:30:00Z")), "19 Oct 2026, 02:30 pm");
    }
}
