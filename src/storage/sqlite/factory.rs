//! `SQLite` session factory.

use std::path::{Path, PathBuf};

use super::connection::{open_existing, open_or_create};
use super::context::SqliteForecastContext;
use crate::storage::session::SessionCounter;
use crate::storage::traits::{ContextFactory, ForecastContext};
use crate::{Error, Result};

/// Schema for the single `forecasts` table.
///
/// `date` holds the day number from the common era (0001-01-01 is day 1) so
/// that ordering by the column is chronological for every year.
const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS forecasts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date INTEGER NOT NULL,
        temperature_c INTEGER NOT NULL,
        summary TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_forecasts_date ON forecasts(date);
";

/// Opens one `SQLite` connection per session against a database file.
///
/// The factory itself holds no connection, only the path, so it can be
/// shared freely across threads and tasks.
#[derive(Debug)]
pub struct SqliteContextFactory {
    path: PathBuf,
    sessions: SessionCounter,
}

impl SqliteContextFactory {
    /// Creates a factory for the database at `path`.
    ///
    /// Nothing is opened until [`ensure_created`](ContextFactory::ensure_created)
    /// or [`create_context`](ContextFactory::create_context) is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sessions: SessionCounter::new(),
        }
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContextFactory for SqliteContextFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn create_context(&self) -> Result<Box<dyn ForecastContext>> {
        let conn = open_existing(&self.path)?;
        tracing::trace!(path = %self.path.display(), "Opened forecast session");
        Ok(Box::new(SqliteForecastContext::new(
            conn,
            self.sessions.open(),
        )))
    }

    fn ensure_created(&self) -> Result<()> {
        let conn = open_or_create(&self.path)?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::OperationFailed {
                operation: "initialize_forecast_schema".to_string(),
                cause: e.to_string(),
            })?;
        tracing::debug!(path = %self.path.display(), "Forecast store ready");
        Ok(())
    }

    fn open_sessions(&self) -> usize {
        self.sessions.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_created_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let factory = SqliteContextFactory::new(dir.path().join("forecasts.db"));

        factory.ensure_created().unwrap();
        factory.ensure_created().unwrap();

        let mut session = factory.create_context().unwrap();
        assert!(session.query_by_date().unwrap().is_empty());
    }

    #[test]
    fn test_create_context_before_store_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        let factory = SqliteContextFactory::new(dir.path().join("forecasts.db"));

        let result = factory.create_context();
        assert!(matches!(result, Err(Error::StoreUnavailable { .. })));
        assert_eq!(factory.open_sessions(), 0);
    }

    #[test]
    fn test_sessions_are_counted_until_dropped() {
        let dir = tempfile::TempDir::new().unwrap();
        let factory = SqliteContextFactory::new(dir.path().join("forecasts.db"));
        factory.ensure_created().unwrap();

        let first = factory.create_context().unwrap();
        let second = factory.create_context().unwrap();
        assert_eq!(factory.open_sessions(), 2);

        drop(first);
        drop(second);
        assert_eq!(factory.open_sessions(), 0);
    }

    #[test]
    fn test_backend_metadata() {
        let factory = SqliteContextFactory::new("/tmp/forecasts.db");
        assert_eq!(factory.backend_name(), "sqlite");
        assert_eq!(factory.location(), "/tmp/forecasts.db");
        assert_eq!(factory.path(), Path::new("/tmp/forecasts.db"));
    }
}
