use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// ISO 8601 timestamp with millisecond precision, e.g. `2010-01-01T00:00:00.000Z`
pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar date as `YYYY-MM-DD`
pub fn format_date<D: Datelike>(value: &D) -> String {
    format!("{:04}-{:02}-{:02}", value.year(), value.month(), value.day())
}
