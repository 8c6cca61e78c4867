//! Small numeric and calendar helpers shared by the stores and the aggregator.

use chrono::{Datelike, Duration, NaiveDate};

/// Round `value` to `places` decimal places, half away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Monday and Sunday of the week containing `day`.
#[must_use]
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(day.weekday().num_days_from_monday());
    let start = day - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Parse a `YYYY-MM-DD` date, falling back to a `YYYY-MM-DD HH:MM:SS`
/// timestamp whose time part is dropped.
pub fn parse_log_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.date())
    })
}
