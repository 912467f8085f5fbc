//! Session and session-factory traits.

use crate::Result;
use crate::models::{ForecastId, NewForecast, WeatherForecast};

/// A change staged on a session, applied by [`ForecastContext::save_changes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Insert a new row; the store assigns the id.
    Add(NewForecast),
    /// Replace every field of the row with the same id.
    Update(WeatherForecast),
    /// Delete the row with this id.
    Remove(ForecastId),
}

/// Outcome of one staged change after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedChange {
    /// A row was inserted; carries the stored record with its assigned id.
    Inserted(WeatherForecast),
    /// A row was replaced.
    Updated(ForecastId),
    /// A row was deleted.
    Removed(ForecastId),
}

/// A short-lived session against the forecast store.
///
/// A session is a unit of work: reads go straight to the store, writes are
/// staged with [`add`](Self::add), [`update`](Self::update), and
/// [`remove`](Self::remove) and applied together by
/// [`save_changes`](Self::save_changes). Dropping the session releases its
/// connection; anything still staged is discarded.
pub trait ForecastContext: Send {
    /// Returns every stored forecast ordered by date, then id.
    fn query_by_date(&mut self) -> Result<Vec<WeatherForecast>>;

    /// Looks up a forecast by id.
    fn find(&mut self, id: ForecastId) -> Result<Option<WeatherForecast>>;

    /// Stages a change.
    fn stage(&mut self, change: PendingChange);

    /// Number of staged changes not yet saved.
    fn pending_changes(&self) -> usize;

    /// Applies all staged changes atomically.
    ///
    /// Returns one [`SavedChange`] per staged change, in staging order. The
    /// staged list is consumed whether the save succeeds or not; on failure
    /// nothing is applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if an update
    /// targets a missing id, or [`Error::OperationFailed`](crate::Error::OperationFailed)
    /// if the store rejects the write.
    fn save_changes(&mut self) -> Result<Vec<SavedChange>>;

    /// Stages an insert.
    fn add(&mut self, forecast: NewForecast) {
        self.stage(PendingChange::Add(forecast));
    }

    /// Stages a full replace.
    fn update(&mut self, forecast: WeatherForecast) {
        self.stage(PendingChange::Update(forecast));
    }

    /// Stages a delete.
    fn remove(&mut self, id: ForecastId) {
        self.stage(PendingChange::Remove(id));
    }
}

/// Produces independent [`ForecastContext`] sessions on demand.
///
/// Implementations must be thread-safe (`Send + Sync`); sessions are not
/// shared, and any number of them may be open at once.
pub trait ContextFactory: Send + Sync {
    /// Short backend name used in logs and metrics.
    fn backend_name(&self) -> &'static str;

    /// Human-readable store location (file path or `memory`).
    fn location(&self) -> String;

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`](crate::Error::StoreUnavailable) if
    /// the store cannot be reached.
    fn create_context(&self) -> Result<Box<dyn ForecastContext>>;

    /// Creates the store and its schema if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be created.
    fn ensure_created(&self) -> Result<()>;

    /// Number of sessions currently open.
    fn open_sessions(&self) -> usize;
}
