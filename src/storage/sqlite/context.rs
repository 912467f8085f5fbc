//! `SQLite` session.

use chrono::{Datelike, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{ForecastId, WeatherForecast};
use crate::storage::session::SessionGuard;
use crate::storage::traits::{ForecastContext, PendingChange, SavedChange};
use crate::{Error, Result};

const SELECT_COLUMNS: &str = "SELECT id, date, temperature_c, summary FROM forecasts";

/// A session holding one `SQLite` connection.
///
/// The connection closes when the session is dropped.
pub struct SqliteForecastContext {
    conn: Connection,
    pending: Vec<PendingChange>,
    _guard: SessionGuard,
}

impl SqliteForecastContext {
    pub(crate) const fn new(conn: Connection, guard: SessionGuard) -> Self {
        Self {
            conn,
            pending: Vec::new(),
            _guard: guard,
        }
    }

    fn forecast_from_row(row: &Row<'_>) -> rusqlite::Result<WeatherForecast> {
        Ok(WeatherForecast {
            id: ForecastId::new(row.get(0)?),
            date: date_from_day(row.get(1)?)?,
            temperature_c: row.get(2)?,
            summary: row.get(3)?,
        })
    }
}

impl ForecastContext for SqliteForecastContext {
    fn query_by_date(&mut self) -> Result<Vec<WeatherForecast>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY date, id"))
            .map_err(|e| failed("prepare_query_by_date", &e))?;

        let forecasts = stmt
            .query_map([], Self::forecast_from_row)
            .map_err(|e| failed("query_by_date", &e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| failed("collect_forecasts", &e))?;

        Ok(forecasts)
    }

    fn find(&mut self, id: ForecastId) -> Result<Option<WeatherForecast>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .map_err(|e| failed("prepare_find", &e))?;

        stmt.query_row(params![id.get()], Self::forecast_from_row)
            .optional()
            .map_err(|e| failed("find", &e))
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

        // Dropping the transaction without commit rolls everything back.
        let tx = self
            .conn
            .transaction()
            .map_err(|e| failed("begin_transaction", &e))?;

        let mut saved = Vec::with_capacity(pending.len());
        for change in pending {
            match change {
                PendingChange::Add(draft) => {
                    tx.execute(
                        "INSERT INTO forecasts (date, temperature_c, summary) VALUES (?1, ?2, ?3)",
                        params![
                            draft.date.num_days_from_ce(),
                            draft.temperature_c,
                            draft.summary
                        ],
                    )
                    .map_err(|e| failed("insert_forecast", &e))?;
                    let id = ForecastId::new(tx.last_insert_rowid());
                    saved.push(SavedChange::Inserted(draft.with_id(id)));
                },
                PendingChange::Update(forecast) => {
                    let rows = tx
                        .execute(
                            "UPDATE forecasts SET date = ?1, temperature_c = ?2, summary = ?3
                             WHERE id = ?4",
                            params![
                                forecast.date.num_days_from_ce(),
                                forecast.temperature_c,
                                forecast.summary,
                                forecast.id.get()
                            ],
                        )
                        .map_err(|e| failed("update_forecast", &e))?;
                    if rows == 0 {
                        return Err(Error::NotFound(format!("forecast {}", forecast.id)));
                    }
                    saved.push(SavedChange::Updated(forecast.id));
                },
                PendingChange::Remove(id) => {
                    tx.execute("DELETE FROM forecasts WHERE id = ?1", params![id.get()])
                        .map_err(|e| failed("delete_forecast", &e))?;
                    saved.push(SavedChange::Removed(id));
                },
            }
        }

        tx.commit().map_err(|e| failed("commit", &e))?;
        Ok(saved)
    }
}

fn date_from_day(day: i32) -> rusqlite::Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(day).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Integer,
            format!("day {day} is outside the supported date range").into(),
        )
    })
}

fn failed(operation: &str, cause: &rusqlite::Error) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewForecast;
    use crate::storage::sqlite::SqliteContextFactory;
    use crate::storage::traits::ContextFactory;
    use chrono::NaiveDate;

    fn create_test_factory() -> (tempfile::TempDir, SqliteContextFactory) {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let factory = SqliteContextFactory::new(dir.path().join("forecasts.db"));
        factory.ensure_created().expect("Failed to create store");
        (dir, factory)
    }

    fn draft(day: u32, temperature_c: i32, summary: Option<&str>) -> NewForecast {
        NewForecast::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            temperature_c,
            summary,
        )
    }

    fn inserted(saved: &[SavedChange]) -> WeatherForecast {
        match &saved[0] {
            SavedChange::Inserted(forecast) => forecast.clone(),
            other => panic!("expected insert, got {other:?}"),
        }
    }

    #[test]
    fn test_add_and_find() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 20, Some("Mild")));
        assert_eq!(session.pending_changes(), 1);
        let stored = inserted(&session.save_changes().unwrap());
        assert_eq!(session.pending_changes(), 0);
        drop(session);

        let mut session = factory.create_context().unwrap();
        let found = session.find(stored.id).unwrap().unwrap();
        assert_eq!(found, stored);
        assert_eq!(found.summary.as_deref(), Some("Mild"));
    }

    #[test]
    fn test_unsaved_changes_are_discarded() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 20, None));
        drop(session);

        let mut session = factory.create_context().unwrap();
        assert!(session.query_by_date().unwrap().is_empty());
    }

    #[test]
    fn test_query_by_date_orders_rows() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(20, 1, None));
        session.add(draft(3, 2, None));
        session.add(draft(11, 3, None));
        session.add(draft(3, 4, None));
        session.save_changes().unwrap();

        let days: Vec<(u32, i32)> = session
            .query_by_date()
            .unwrap()
            .iter()
            .map(|f| (chrono::Datelike::day(&f.date), f.temperature_c))
            .collect();
        assert_eq!(days, vec![(3, 2), (3, 4), (11, 3), (20, 1)]);
    }

    #[test]
    fn test_failed_save_applies_nothing() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 10, None));
        session.update(draft(2, 99, None).with_id(ForecastId::new(4242)));

        let result = session.save_changes();
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(session.pending_changes(), 0);
        assert!(session.query_by_date().unwrap().is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 10, Some("Cool")));
        let stored = inserted(&session.save_changes().unwrap());

        session.update(stored.clone().replaced_with(draft(2, 30, Some("Hot"))));
        assert_eq!(
            session.save_changes().unwrap(),
            vec![SavedChange::Updated(stored.id)]
        );
        let updated = session.find(stored.id).unwrap().unwrap();
        assert_eq!(updated.temperature_c, 30);
        assert_eq!(updated.summary.as_deref(), Some("Hot"));

        session.remove(stored.id);
        assert_eq!(
            session.save_changes().unwrap(),
            vec![SavedChange::Removed(stored.id)]
        );
        assert!(session.find(stored.id).unwrap().is_none());
    }

    #[test]
    fn test_query_by_date_is_chronological_across_eras() {
        let (_dir, factory) = create_test_factory();
        let dates = [
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(10_000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(-2, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(-1, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap(),
        ];

        let mut session = factory.create_context().unwrap();
        for date in dates {
            session.add(NewForecast::new(date, 0, None));
        }
        session.save_changes().unwrap();

        let listed: Vec<NaiveDate> = session
            .query_by_date()
            .unwrap()
            .iter()
            .map(|f| f.date)
            .collect();
        let mut expected = dates.to_vec();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (_dir, factory) = create_test_factory();

        let mut session = factory.create_context().unwrap();
        session.add(draft(1, 1, None));
        let first = inserted(&session.save_changes().unwrap());
        session.remove(first.id);
        session.save_changes().unwrap();

        session.add(draft(1, 1, None));
        let second = inserted(&session.save_changes().unwrap());
        assert!(second.id > first.id);
    }

    #[test]
    fn test_empty_save_is_noop() {
        let (_dir, factory) = create_test_factory();
        let mut session = factory.create_context().unwrap();
        assert!(session.save_changes().unwrap().is_empty());
    }
}
