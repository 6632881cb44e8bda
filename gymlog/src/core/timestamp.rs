//! ISO-8601 timestamp coercion.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Coerce a raw date into canonical ISO form, or return `fallback`.
///
/// Strings are read as RFC 3339, a zone-less date-time (UTC), or a bare date
/// (UTC midnight). Numbers are epoch milliseconds.
pub fn to_iso_string(raw: &Value, fallback: &str) -> String {
    let parsed = match raw {
        Value::String(text) => parse_date_text(text),
        Value::Number(number) => number.as_f64().and_then(from_epoch_millis),
        _ => None,
    };
    parsed
        .filter(representable)
        .map_or_else(|| fallback.to_string(), format_iso)
}

/// Parse a date string. Only four-digit years are accepted so the canonical
/// form always parses back.
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    parse_text(text).filter(representable)
}

fn representable(at: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&at.year())
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > 8.64e15 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}
