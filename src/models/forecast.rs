//! Weather forecast records.
//!
//! A [`WeatherForecast`] is the single entity persisted by this crate. Records
//! that have not been stored yet are [`NewForecast`] values; the store assigns
//! the [`ForecastId`] when the insert is saved.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Summary labels offered as input suggestions.
///
/// Summaries are free text; these are suggestions, not a closed set.
pub const SUMMARY_LABELS: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Date format used for storage, forms, and the CLI.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store-assigned surrogate key of a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastId(i64);

impl ForecastId {
    /// Wraps a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parses an id from user input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the input is not an integer.
    pub fn parse(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidInput(format!("'{s}' is not a valid forecast id")))
    }
}

impl fmt::Display for ForecastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ForecastId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A forecast that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewForecast {
    /// Calendar date of the forecast.
    pub date: NaiveDate,
    /// Temperature in degrees Celsius.
    pub temperature_c: i32,
    /// Optional short label, usually one of [`SUMMARY_LABELS`].
    pub summary: Option<String>,
}

impl NewForecast {
    /// Creates a new unsaved forecast.
    ///
    /// A blank summary is stored as no summary.
    #[must_use]
    pub fn new(date: NaiveDate, temperature_c: i32, summary: Option<&str>) -> Self {
        Self {
            date,
            temperature_c,
            summary: normalize_summary(summary),
        }
    }

    /// Builds a forecast from raw text fields (CLI arguments or form input).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the date or temperature cannot be parsed.
    pub fn from_input(date: &str, temperature_c: &str, summary: Option<&str>) -> Result<Self> {
        Ok(Self::new(
            parse_date(date)?,
            parse_temperature(temperature_c)?,
            summary,
        ))
    }

    /// Attaches a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: ForecastId) -> WeatherForecast {
        WeatherForecast {
            id,
            date: self.date,
            temperature_c: self.temperature_c,
            summary: self.summary,
        }
    }
}

/// A stored weather forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherForecast {
    /// Store-assigned id, immutable once assigned.
    pub id: ForecastId,
    /// Calendar date of the forecast.
    pub date: NaiveDate,
    /// Temperature in degrees Celsius.
    pub temperature_c: i32,
    /// Optional short label.
    pub summary: Option<String>,
}

impl WeatherForecast {
    /// Temperature in degrees Fahrenheit, for display only.
    ///
    /// Computed as `32 + temperature_c / 0.5556`, truncated toward zero.
    /// Values beyond the `i32` range saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn temperature_f(&self) -> i32 {
        (32.0 + (f64::from(self.temperature_c) / 0.5556).trunc()) as i32
    }

    /// Replaces every mutable field with the values of `draft`.
    #[must_use]
    pub fn replaced_with(self, draft: NewForecast) -> Self {
        draft.with_id(self.id)
    }

    /// Returns the summary, or an empty string.
    #[must_use]
    pub fn summary_or_empty(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

/// Returns `true` if `summary` is one of the suggested labels (case-insensitive).
#[must_use]
pub fn is_known_summary(summary: &str) -> bool {
    SUMMARY_LABELS
        .iter()
        .any(|label| label.eq_ignore_ascii_case(summary.trim()))
}

/// Parses a `YYYY-MM-DD` date.
///
/// Only four-digit years (0000 to 9999) are accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the date is malformed or its year is
/// signed or longer than four digits.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("'{s}' is not a YYYY-MM-DD date: {e}")))?;

    if !(0..=9999).contains(&date.year()) {
        return Err(Error::InvalidInput(format!(
            "'{s}' is not a YYYY-MM-DD date: year must have four digits"
        )));
    }

    Ok(date)
}

/// Parses a whole-degree Celsius temperature.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the value is not an integer.
pub fn parse_temperature(s: &str) -> Result<i32> {
    s.trim()
        .parse::<i32>()
        .map_err(|_| Error::InvalidInput(format!("'{s}' is not a whole-degree temperature")))
}

fn normalize_summary(summary: Option<&str>) -> Option<String> {
    summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
