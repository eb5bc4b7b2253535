//! Custom Askama template filters and Spanish date formatting.

use std::fmt::Display;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Local::now().year())
}

/// Long Spanish date: `5 de marzo de 2025`.
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    let month = MONTHS
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} de {month} de {}", date.day(), date.year())
}

/// Long Spanish date with time: `1 de marzo de 2025, 10:30`.
///
/// Shown in the offset the backend reported.
#[must_use]
pub fn long_datetime(timestamp: &DateTime<FixedOffset>) -> String {
    format!(
        "{}, {:02}:{:02}",
        long_date(timestamp.date_naive()),
        timestamp.hour(),
        timestamp.minute()
    )
}
