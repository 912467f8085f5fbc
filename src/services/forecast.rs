//! Forecast CRUD service.
//!
//! Each operation opens its own session from the [`ContextFactory`], does one
//! unit of work, and lets the session drop before returning. Sessions are
//! never reused across calls, so a long-lived caller (the HTML UI, say) holds
//! no connection between interactions and never sees stale state.
//!
//! Sessions are blocking, so every unit of work runs on the blocking pool via
//! [`tokio::task::spawn_blocking`]. The session is owned by that closure and is
//! dropped on every exit path, including errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use forecasts::services::ForecastService;
//! use forecasts::storage::InMemoryContextFactory;
//!
//! let service = ForecastService::new(Arc::new(InMemoryContextFactory::new()));
//! let stored = service.create(NewForecast::new(date, 20, Some("Mild"))).await?;
//! service.delete(stored.id).await?;
//! assert!(service.get(stored.id).await?.is_none());
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::instrument;

use crate::models::{ForecastId, NewForecast, SUMMARY_LABELS, WeatherForecast, is_known_summary};
use crate::storage::metrics::{record_operation_metrics, status_label};
use crate::storage::{ContextFactory, ForecastContext, SavedChange};
use crate::{Error, Result};

/// Service for forecast CRUD operations.
#[derive(Clone)]
pub struct ForecastService {
    factory: Arc<dyn ContextFactory>,
}

impl ForecastService {
    /// Creates a service over the given session factory.
    #[must_use]
    pub fn new(factory: Arc<dyn ContextFactory>) -> Self {
        Self { factory }
    }

    /// Returns the session factory.
    #[must_use]
    pub fn factory(&self) -> &Arc<dyn ContextFactory> {
        &self.factory
    }

    /// Summary labels offered as input suggestions.
    #[must_use]
    pub const fn summaries() -> &'static [&'static str] {
        &SUMMARY_LABELS
    }

    /// Lists every forecast in ascending date order.
    ///
    /// An empty store yields an empty list.
    #[instrument(skip(self), fields(operation = "forecast.list"))]
    pub async fn list(&self) -> Result<Vec<WeatherForecast>> {
        self.run("list", |ctx| ctx.query_by_date()).await
    }

    /// Gets a forecast by id, or `None` if no such forecast exists.
    #[instrument(skip(self), fields(operation = "forecast.get"))]
    pub async fn get(&self, id: ForecastId) -> Result<Option<WeatherForecast>> {
        self.run("get", move |ctx| ctx.find(id)).await
    }

    /// Stores a new forecast and returns it with its assigned id.
    #[instrument(skip(self), fields(operation = "forecast.create"))]
    pub async fn create(&self, forecast: NewForecast) -> Result<WeatherForecast> {
        if let Some(summary) = forecast.summary.as_deref() {
            if !is_known_summary(summary) {
                tracing::debug!(summary, "Summary is not a suggested label");
            }
        }

        let stored = self
            .run("create", move |ctx| {
                ctx.add(forecast);
                ctx.save_changes()?
                    .into_iter()
                    .find_map(|change| match change {
                        SavedChange::Inserted(stored) => Some(stored),
                        SavedChange::Updated(_) | SavedChange::Removed(_) => None,
                    })
                    .ok_or_else(|| Error::OperationFailed {
                        operation: "create".to_string(),
                        cause: "store reported no inserted row".to_string(),
                    })
            })
            .await?;

        tracing::info!(id = %stored.id, date = %stored.date, "Forecast created");
        Ok(stored)
    }

    /// Replaces every field of the stored forecast with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no forecast has this id; the store is
    /// left unchanged.
    #[instrument(skip(self), fields(operation = "forecast.update"))]
    pub async fn update(&self, forecast: WeatherForecast) -> Result<WeatherForecast> {
        let updated = self
            .run("update", move |ctx| {
                ctx.update(forecast.clone());
                ctx.save_changes()?;
                Ok(forecast)
            })
            .await?;

        tracing::info!(id = %updated.id, "Forecast updated");
        Ok(updated)
    }

    /// Deletes a forecast if it exists.
    ///
    /// Returns `true` if a forecast was removed. A missing id is not an
    /// error: nothing is committed and `false` is returned.
    #[instrument(skip(self), fields(operation = "forecast.delete"))]
    pub async fn delete(&self, id: ForecastId) -> Result<bool> {
        let deleted = self
            .run("delete", move |ctx| {
                let Some(existing) = ctx.find(id)? else {
                    return Ok(false);
                };
                ctx.remove(existing.id);
                ctx.save_changes()?;
                Ok(true)
            })
            .await?;

        if deleted {
            tracing::info!(id = %id, "Forecast deleted");
        }
        Ok(deleted)
    }

    /// Runs one unit of work on a fresh session.
    ///
    /// The session is created and dropped on the blocking pool; no session
    /// outlives this call.
    async fn run<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn ForecastContext) -> Result<T> + Send + 'static,
    {
        let factory = Arc::clone(&self.factory);
        let backend = factory.backend_name();
        let start = Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            let mut context = factory.create_context()?;
            work(context.as_mut())
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(Error::OperationFailed {
                operation: format!("join_{operation}"),
                cause: e.to_string(),
            }),
        };

        record_operation_metrics(backend, operation, start, status_label(&result));
        if let Err(e) = &result {
            tracing::warn!(operation, backend, error = %e, "Forecast operation failed");
        }

        result
    }
}
