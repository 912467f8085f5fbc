//! Forecast CRUD commands.

use std::io::Write;
use std::str::FromStr;

use super::write_failed;
use crate::models::{DATE_FORMAT, ForecastId, NewForecast, WeatherForecast};
use crate::services::ForecastService;
use crate::{Error, Result};

/// Output format for forecast commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Picks JSON when `json` is set.
    #[must_use]
    pub const fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Table }
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        })
    }
}

/// Writes forecasts as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(writer: &mut W, forecasts: &[WeatherForecast]) -> Result<()> {
    if forecasts.is_empty() {
        return writeln!(writer, "No forecasts.").map_err(write_failed);
    }

    writeln!(
        writer,
        "{:<6}{:<12}{:>7}{:>7}  SUMMARY",
        "ID", "DATE", "TEMP_C", "TEMP_F"
    )
    .map_err(write_failed)?;
    for forecast in forecasts {
        writeln!(
            writer,
            "{:<6}{:<12}{:>7}{:>7}  {}",
            forecast.id.to_string(),
            forecast.date.format(DATE_FORMAT).to_string(),
            forecast.temperature_c,
            forecast.temperature_f(),
            forecast.summary_or_empty()
        )
        .map_err(write_failed)?;
    }
    Ok(())
}

/// Writes one forecast as `key: value` lines.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_detail<W: Write>(writer: &mut W, forecast: &WeatherForecast) -> Result<()> {
    writeln!(writer, "id:            {}", forecast.id).map_err(write_failed)?;
    writeln!(writer, "date:          {}", forecast.date.format(DATE_FORMAT)).map_err(write_failed)?;
    writeln!(writer, "temperature_c: {}", forecast.temperature_c).map_err(write_failed)?;
    writeln!(writer, "temperature_f: {}", forecast.temperature_f()).map_err(write_failed)?;
    writeln!(writer, "summary:       {}", forecast.summary_or_empty()).map_err(write_failed)
}

/// Writes any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: serde::Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_json".to_string(),
        cause: e.to_string(),
    })?;
    writeln!(writer, "{json}").map_err(write_failed)
}

fn write_one<W: Write>(writer: &mut W, forecast: &WeatherForecast, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_detail(writer, forecast),
        OutputFormat::Json => write_json(writer, forecast),
    }
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output fails.
pub async fn cmd_list<W: Write>(
    service: &ForecastService,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let forecasts = service.list().await?;
    match format {
        OutputFormat::Table => write_table(writer, &forecasts),
        OutputFormat::Json => write_json(writer, &forecasts),
    }
}

/// Executes the get command.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a malformed id and
/// [`Error::NotFound`] if no forecast has it.
pub async fn cmd_get<W: Write>(
    service: &ForecastService,
    id: &str,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let id = ForecastId::parse(id)?;
    let forecast = service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("forecast {id}")))?;
    write_one(writer, &forecast, format)
}

/// Executes the add command.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a malformed date or temperature, or a
/// store error if the save fails.
pub async fn cmd_add<W: Write>(
    service: &ForecastService,
    date: &str,
    temperature_c: &str,
    summary: Option<&str>,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let draft = NewForecast::from_input(date, temperature_c, summary)?;
    let stored = service.create(draft).await?;
    write_one(writer, &stored, format)
}

/// Executes the update command.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for malformed arguments and
/// [`Error::NotFound`] if no forecast has the id.
pub async fn cmd_update<W: Write>(
    service: &ForecastService,
    id: &str,
    date: &str,
    temperature_c: &str,
    summary: Option<&str>,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let id = ForecastId::parse(id)?;
    let draft = NewForecast::from_input(date, temperature_c, summary)?;
    let updated = service.update(draft.with_id(id)).await?;
    write_one(writer, &updated, format)
}

/// Executes the delete command.
///
/// Deleting an id that does not exist succeeds and says so.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a malformed id or a store error.
pub async fn cmd_delete<W: Write>(service: &ForecastService, id: &str, writer: &mut W) -> Result<()> {
    let id = ForecastId::parse(id)?;
    if service.delete(id).await? {
        writeln!(writer, "Deleted forecast {id}").map_err(write_failed)
    } else {
        writeln!(writer, "No forecast {id}; nothing deleted").map_err(write_failed)
    }
}

/// Executes the summaries command.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn cmd_summaries<W: Write>(writer: &mut W) -> Result<()> {
    for label in ForecastService::summaries() {
        writeln!(writer, "{label}").map_err(write_failed)?;
    }
    Ok(())
}
