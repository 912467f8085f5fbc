//! Server-side HTML rendering for the forecast UI.
//!
//! Pages are assembled with [`std::fmt::Write`]; every user-supplied value
//! passes through [`escape_html`].

use std::fmt::Write;

use crate::models::{DATE_FORMAT, SUMMARY_LABELS, WeatherForecast};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:48rem}\
table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
form.inline{display:inline}\
.error{color:#a00}";

/// Raw field values of the create/edit form.
///
/// Kept as text so a rejected submission can be shown back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    /// `YYYY-MM-DD` date.
    pub date: String,
    /// Whole-degree Celsius temperature.
    pub temperature_c: String,
    /// Summary, possibly blank.
    pub summary: String,
}

impl From<&WeatherForecast> for FormValues {
    fn from(forecast: &WeatherForecast) -> Self {
        Self {
            date: forecast.date.format(DATE_FORMAT).to_string(),
            temperature_c: forecast.temperature_c.to_string(),
            summary: forecast.summary_or_empty().to_string(),
        }
    }
}

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wraps a page body in the shared document layout.
#[must_use]
pub fn layout(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/forecasts\">Forecasts</a> | <a href=\"/forecasts/new\">New forecast</a></nav>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    )
}

/// Renders the forecast table.
#[must_use]
pub fn forecast_list_page(forecasts: &[WeatherForecast]) -> String {
    let mut body = String::new();

    if forecasts.is_empty() {
        body.push_str("<p><em>No forecasts yet.</em></p>");
        return layout("Weather forecasts", &body);
    }

    body.push_str(
        "<table>\n<thead><tr><th>Date</th><th>Temp. (C)</th><th>Temp. (F)</th>\
         <th>Summary</th><th></th></tr></thead>\n<tbody>\n",
    );
    for forecast in forecasts {
        let id = forecast.id;
        let _ = writeln!(
            body,
            "<tr><td><a href=\"/forecasts/{id}\">{date}</a></td><td>{c}</td><td>{f}</td><td>{summary}</td>\
             <td><a href=\"/forecasts/{id}/edit\">Edit</a> \
             <form class=\"inline\" method=\"post\" action=\"/forecasts/{id}/delete\">\
             <button type=\"submit\">Delete</button></form></td></tr>",
            date = forecast.date.format(DATE_FORMAT),
            c = forecast.temperature_c,
            f = forecast.temperature_f(),
            summary = escape_html(forecast.summary_or_empty()),
        );
    }
    body.push_str("</tbody>\n</table>");

    layout("Weather forecasts", &body)
}

/// Renders a single forecast.
#[must_use]
pub fn forecast_detail_page(forecast: &WeatherForecast) -> String {
    let id = forecast.id;
    let mut body = String::from("<dl>\n");
    let _ = writeln!(body, "<dt>Id</dt><dd>{id}</dd>");
    let _ = writeln!(
        body,
        "<dt>Date</dt><dd>{}</dd>",
        forecast.date.format(DATE_FORMAT)
    );
    let _ = writeln!(
        body,
        "<dt>Temperature</dt><dd>{} C / {} F</dd>",
        forecast.temperature_c,
        forecast.temperature_f()
    );
    let _ = writeln!(
        body,
        "<dt>Summary</dt><dd>{}</dd>",
        escape_html(forecast.summary_or_empty())
    );
    body.push_str("</dl>\n");
    let _ = write!(
        body,
        "<p><a href=\"/forecasts/{id}/edit\">Edit</a></p>\
         <form method=\"post\" action=\"/forecasts/{id}/delete\"><button type=\"submit\">Delete</button></form>"
    );

    layout(&format!("Forecast {id}"), &body)
}

/// Renders the create or edit form.
///
/// `action` is the POST target; `error` is shown above the form when a
/// previous submission was rejected.
#[must_use]
pub fn forecast_form_page(title: &str, action: &str, values: &FormValues, error: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(error));
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"{action}\">\n\
         <p><label>Date <input type=\"date\" name=\"date\" required value=\"{date}\"></label></p>\n\
         <p><label>Temperature (C) <input type=\"number\" name=\"temperature_c\" required value=\"{temp}\"></label></p>\n\
         <p><label>Summary <input type=\"text\" name=\"summary\" list=\"summaries\" value=\"{summary}\"></label></p>\n\
         {datalist}\n\
         <p><button type=\"submit\">Save</button></p>\n</form>",
        action = escape_html(action),
        date = escape_html(&values.date),
        temp = escape_html(&values.temperature_c),
        summary = escape_html(&values.summary),
        datalist = summaries_datalist(),
    );

    layout(title, &body)
}

/// Renders an error page.
#[must_use]
pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<p class=\"error\">{}</p>\n<p><a href=\"/forecasts\">Back to forecasts</a></p>",
            escape_html(message)
        ),
    )
}

fn summaries_datalist() -> String {
    let mut out = String::from("<datalist id=\"summaries\">");
    for label in SUMMARY_LABELS {
        let _ = write!(out, "<option value=\"{label}\">");
    }
    out.push_str("</datalist>");
    out
}
