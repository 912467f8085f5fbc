//! Request handlers.

use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::models::{ForecastId, NewForecast};
use crate::rendering::{
    FormValues, error_page, forecast_detail_page, forecast_form_page, forecast_list_page,
};
use crate::services::ForecastService;
use crate::Error;

/// Create/edit form body.
///
/// Missing fields deserialize as empty strings so they are reported through
/// the form instead of as an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastForm {
    #[serde(default)]
    date: String,
    #[serde(default)]
    temperature_c: String,
    #[serde(default)]
    summary: String,
}

impl ForecastForm {
    fn parse(&self) -> crate::Result<NewForecast> {
        NewForecast::from_input(&self.date, &self.temperature_c, Some(&self.summary))
    }

    fn values(self) -> FormValues {
        FormValues {
            date: self.date,
            temperature_c: self.temperature_c,
            summary: self.summary,
        }
    }
}

/// Error page response.
pub struct PageError(Error);

impl From<Error> for PageError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title) = match &self.0 {
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            Error::StoreUnavailable { .. }
            | Error::OperationFailed { .. }
            | Error::FeatureNotEnabled(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error"),
        };
        (status, Html(error_page(title, &self.0.to_string()))).into_response()
    }
}

type PageResult = Result<Response, PageError>;

fn not_found(id: ForecastId) -> PageError {
    PageError(Error::NotFound(format!("forecast {id}")))
}

fn form_rejected(title: &str, action: &str, form: ForecastForm, error: &Error) -> Response {
    let page = forecast_form_page(title, action, &form.values(), Some(&error.to_string()));
    (StatusCode::BAD_REQUEST, Html(page)).into_response()
}

pub async fn index() -> Redirect {
    Redirect::to("/forecasts")
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics() -> String {
    crate::observability::prometheus_handle()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

pub async fn list_forecasts(State(service): State<ForecastService>) -> PageResult {
    let forecasts = service.list().await?;
    Ok(Html(forecast_list_page(&forecasts)).into_response())
}

pub async fn show_forecast(
    State(service): State<ForecastService>,
    Path(id): Path<String>,
) -> PageResult {
    let id = ForecastId::parse(&id)?;
    let forecast = service.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Html(forecast_detail_page(&forecast)).into_response())
}

pub async fn new_forecast_form() -> Html<String> {
    Html(forecast_form_page(
        "New forecast",
        "/forecasts",
        &FormValues::default(),
        None,
    ))
}

pub async fn create_forecast(
    State(service): State<ForecastService>,
    Form(form): Form<ForecastForm>,
) -> PageResult {
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => return Ok(form_rejected("New forecast", "/forecasts", form, &e)),
    };

    service.create(draft).await?;
    Ok(Redirect::to("/forecasts").into_response())
}

pub async fn edit_forecast_form(
    State(service): State<ForecastService>,
    Path(id): Path<String>,
) -> PageResult {
    let id = ForecastId::parse(&id)?;
    let forecast = service.get(id).await?.ok_or_else(|| not_found(id))?;
    let page = forecast_form_page(
        &format!("Edit forecast {id}"),
        &format!("/forecasts/{id}"),
        &FormValues::from(&forecast),
        None,
    );
    Ok(Html(page).into_response())
}

pub async fn update_forecast(
    State(service): State<ForecastService>,
    Path(id): Path<String>,
    Form(form): Form<ForecastForm>,
) -> PageResult {
    let id = ForecastId::parse(&id)?;
    let draft = match form.parse() {
        Ok(draft) => draft,
        Err(e) => {
            return Ok(form_rejected(
                &format!("Edit forecast {id}"),
                &format!("/forecasts/{id}"),
                form,
                &e,
            ));
        },
    };

    service.update(draft.with_id(id)).await?;
    Ok(Redirect::to("/forecasts").into_response())
}

pub async fn delete_forecast(
    State(service): State<ForecastService>,
    Path(id): Path<String>,
) -> PageResult {
    let id = ForecastId::parse(&id)?;
    service.delete(id).await?;
    Ok(Redirect::to("/forecasts").into_response())
}
