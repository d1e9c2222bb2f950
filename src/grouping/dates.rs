use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    // EXIF DateTimeOriginal
    "%Y:%m:%d %H:%M:%S",
];

/// Parses the date strings found in item records.
///
/// Offsets in RFC 3339 strings are kept as written, so a photo taken at
/// 23:30 local time stays on its local calendar day.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a day bucket label, e.g. "29 June 2018".
pub fn day_label(date: &NaiveDateTime) -> String {
    date.format("%-d %B %Y").to_string()
}
