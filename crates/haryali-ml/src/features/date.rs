use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

/// Calendar parts of an observation date. Weekday counts from Monday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: u32,
}

impl DateParts {
    /// Encoding used for dates that could not be read; the price model was trained on it.
    pub const MISSING: Self = Self {
        year: 0,
        month: 0,
        day: 0,
        weekday: 0,
    };

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            weekday: date.weekday().num_days_from_monday(),
        }
    }

    pub fn is_missing(&self) -> bool {
        *self == Self::MISSING
    }
}

/// Splits a loosely formatted date into calendar parts. Never fails: anything that
/// does not resolve to a real calendar date becomes [`DateParts::MISSING`].
pub fn decompose(raw: &str) -> DateParts {
    parse_permissive(raw)
        .map(DateParts::from_date)
        .unwrap_or(DateParts::MISSING)
}

pub fn parse_permissive(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
        .or_else(|| year_month(value))
        .or_else(|| bare_year(value))
        .filter(|date| representable(*date))
}

// Bounds of a nanosecond timestamp, the range the training pipeline could represent.
fn representable(date: NaiveDate) -> bool {
    let key = (date.year(), date.month(), date.day());
    ((1677, 9, 22)..=(2262, 4, 11)).contains(&key)
}

// `YYYY` resolves to the first of January.
fn bare_year(value: &str) -> Option<NaiveDate> {
    if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1)
}

// `YYYY-MM` resolves to the first day of that month.
fn year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    let digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if year.len() != 4 || month.len() > 2 || !digits(year) || !digits(month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}
