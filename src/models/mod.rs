//! Data models for forecasts.

mod forecast;

pub use forecast::{
    DATE_FORMAT, ForecastId, NewForecast, SUMMARY_LABELS, WeatherForecast, is_known_summary,
    parse_date, parse_temperature,
};
