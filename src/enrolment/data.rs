//! Cleaned enrolment row and field coercion

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One cleaned enrolment record
///
/// `date`, `district` and `pincode` are always present and non-empty. Age
/// counts that failed to parse are `None`; `total` sums only the present ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolmentRow {
    /// First day of the calendar month the record falls in
    pub date: NaiveDate,
    pub district: String,
    pub pincode: String,
    pub age_0_5: Option<f64>,
    pub age_5_17: Option<f64>,
    pub age_18_plus: Option<f64>,
    pub total: f64,
}

impl EnrolmentRow {
    /// Build a row, computing `total` from whichever age counts are present
    pub fn new(
        date: NaiveDate,
        district: impl Into<String>,
        pincode: impl Into<String>,
        age_0_5: Option<f64>,
        age_5_17: Option<f64>,
        age_18_plus: Option<f64>,
    ) -> Self {
        let total: f64 = [age_0_5, age_5_17, age_18_plus].iter().flatten().sum();
        Self {
            date: month_start(date),
            district: district.into(),
            pincode: pincode.into(),
            age_0_5,
            age_5_17,
            age_18_plus,
            total,
        }
    }
}

/// Day-first formats are tried before ISO ones, matching Indian source data
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Two-digit years, only tried once the four-digit formats fail
const SHORT_YEAR_FORMATS: &[&str] = &["%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d-%b-%y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
];

/// `%Y` accepts "25" as year 25 AD; such parses are short years misread
fn four_digit_year(date: &NaiveDate) -> bool {
    date.year() >= 1000
}

/// Parse a textual date into its calendar month marker
///
/// Returns `None` for anything unrecognised; callers drop those rows.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .filter(four_digit_year)
        .or_else(|| {
            SHORT_YEAR_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
                .filter(four_digit_year)
        })
        .or_else(|| {
            // Zulu or offset timestamps; the local calendar date is kept
            DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
        })
        .or_else(|| {
            // Year-month only, e.g. "2025-03"
            NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
                .ok()
                .filter(four_digit_year)
        })?;

    Some(month_start(parsed))
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse an age count; non-numeric, non-finite and negative values are missing
pub fn parse_count(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
