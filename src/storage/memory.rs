//! In-memory forecast store.
//!
//! Provides a fast, non-persistent implementation of [`ContextFactory`] for
//! unit tests and throwaway runs. All sessions of one factory see the same
//! table; each save applies under a single write lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::models::{ForecastId, WeatherForecast};
use crate::storage::session::{SessionCounter, SessionGuard};
use crate::storage::traits::{ContextFactory, ForecastContext, PendingChange, SavedChange};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    rows: BTreeMap<ForecastId, WeatherForecast>,
    last_id: i64,
}

impl MemoryTable {
    fn apply(&mut self, change: PendingChange) -> Result<SavedChange> {
        match change {
            PendingChange::Add(draft) => {
                self.last_id += 1;
                let forecast = draft.with_id(ForecastId::new(self.last_id));
                self.rows.insert(forecast.id, forecast.clone());
                Ok(SavedChange::Inserted(forecast))
            },
            PendingChange::Update(forecast) => {
                let id = forecast.id;
                match self.rows.get_mut(&id) {
                    Some(row) => {
                        *row = forecast;
                        Ok(SavedChange::Updated(id))
                    },
                    None => Err(Error::NotFound(format!("forecast {id}"))),
                }
            },
            PendingChange::Remove(id) => {
                self.rows.remove(&id);
                Ok(SavedChange::Removed(id))
            },
        }
    }
}

/// In-memory session factory.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics. The
/// lock is only held inside a single session call. Data is not persisted
/// between runs.
#[derive(Debug)]
pub struct InMemoryContextFactory {
    table: Arc<RwLock<MemoryTable>>,
    available: AtomicBool,
    sessions: SessionCounter,
}

impl Default for InMemoryContextFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContextFactory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(MemoryTable::default())),
            available: AtomicBool::new(true),
            sessions: SessionCounter::new(),
        }
    }

    /// Marks the store reachable or not. While unavailable, opening a
    /// session fails with [`Error::StoreUnavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored forecasts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContextFactory for InMemoryContextFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn create_context(&self) -> Result<Box<dyn ForecastContext>> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable {
                location: self.location(),
                cause: "store marked unavailable".to_string(),
            });
        }

        Ok(Box::new(InMemoryForecastContext {
            table: Arc::clone(&self.table),
            pending: Vec::new(),
            _guard: self.sessions.open(),
        }))
    }

    fn ensure_created(&self) -> Result<()> {
        Ok(())
    }

    fn open_sessions(&self) -> usize {
        self.sessions.current()
    }
}

/// Session over the shared in-memory table.
struct InMemoryForecastContext {
    table: Arc<RwLock<MemoryTable>>,
    pending: Vec<PendingChange>,
    _guard: SessionGuard,
}

impl ForecastContext for InMemoryForecastContext {
    fn query_by_date(&mut self) -> Result<Vec<WeatherForecast>> {
        let table = self.table.read().map_err(|e| Error::OperationFailed {
            operation: "read_forecasts".to_string(),
            cause: e.to_string(),
        })?;

        let mut forecasts: Vec<WeatherForecast> = table.rows.values().cloned().collect();
        forecasts.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(forecasts)
    }

    fn find(&mut self, id: ForecastId) -> Result<Option<WeatherForecast>> {
        let table = self.table.read().map_err(|e| Error::OperationFailed {
            operation: "read_forecasts".to_string(),
            cause: e.to_string(),
        })?;

        Ok(table.rows.get(&id).cloned())
    }

    fn stage(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    fn save_changes(&mut self) -> Result<Vec<SavedChange>> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let mut table = self.table.write().map_err(|e| Error::OperationFailed {
            operation: "write_forecasts".to_string(),
            cause: e.to_string(),
        })?;

        // Apply to a copy so a failing change leaves the table untouched.
        let mut working = table.clone();
        let saved = pending
            .into_iter()
            .map(|change| working.apply(change))
            .collect::<Result<Vec<_>>>()?;
        *table = working;

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewForecast;
    use chrono::NaiveDate;

    fn draft(day: u32, temperature_c: i32) -> NewForecast {
        NewForecast::new(
            NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            temperature_c,
            None,
        )
    }

    #[test]
    fn test_sessions_share_table() {
        let factory = InMemoryContextFactory::new();

        let mut writer = factory.create_context().unwrap();
        writer.add(draft(1, 10));
        writer.save_changes().unwrap();

        let mut reader = factory.create_context().unwrap();
        assert_eq!(reader.query_by_date().unwrap().len(), 1);
        assert_eq!(factory.len(), 1);
        assert_eq!(factory.open_sessions(), 2);
    }

    #[test]
    fn test_failed_save_leaves_table_untouched() {
        let factory = InMemoryContextFactory::new();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 10));
        session.update(draft(2, 20).with_id(ForecastId::new(77)));
        assert!(matches!(session.save_changes(), Err(Error::NotFound(_))));
        assert!(factory.is_empty());

        // The next id is still the first one.
        session.add(draft(3, 30));
        let saved = session.save_changes().unwrap();
        assert!(matches!(
            &saved[0],
            SavedChange::Inserted(f) if f.id == ForecastId::new(1)
        ));
    }

    #[test]
    fn test_remove_then_update_in_one_save_fails() {
        let factory = InMemoryContextFactory::new();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 10));
        session.save_changes().unwrap();

        let id = ForecastId::new(1);
        session.remove(id);
        session.update(draft(1, 12).with_id(id));
        assert!(session.save_changes().is_err());
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn test_unavailable_store() {
        let factory = InMemoryContextFactory::new();
        factory.set_available(false);

        assert!(matches!(
            factory.create_context(),
            Err(Error::StoreUnavailable { .. })
        ));
        assert_eq!(factory.open_sessions(), 0);

        factory.set_available(true);
        assert!(factory.create_context().is_ok());
    }

    #[test]
    fn test_query_by_date_ties_break_on_id() {
        let factory = InMemoryContextFactory::new();

        let mut session = factory.create_context().unwrap();
        session.add(draft(9, 1));
        session.add(draft(2, 2));
        session.add(draft(2, 3));
        session.save_changes().unwrap();

        let temps: Vec<i32> = session
            .query_by_date()
            .unwrap()
            .iter()
            .map(|f| f.temperature_c)
            .collect();
        assert_eq!(temps, vec![2, 3, 1]);
    }
}
