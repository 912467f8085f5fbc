//! Integration tests for the forecast service against both backends.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::NaiveDate;
use forecasts::storage::{ContextFactory, InMemoryContextFactory, SqliteContextFactory};
use forecasts::{Error, ForecastId, ForecastService, NewForecast};
use std::sync::Arc;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sqlite_factory(dir: &TempDir) -> Arc<SqliteContextFactory> {
    let factory = Arc::new(SqliteContextFactory::new(dir.path().join("forecasts.db")));
    factory.ensure_created().unwrap();
    factory
}

/// Runs the full lifecycle scenario on a factory.
async fn lifecycle(factory: Arc<dyn ContextFactory>) {
    let service = ForecastService::new(Arc::clone(&factory));

    assert!(service.list().await.unwrap().is_empty());

    let jan = service
        .create(NewForecast::new(date(2024, 1, 1), 20, Some("Mild")))
        .await
        .unwrap();
    let feb = service
        .create(NewForecast::new(date(2024, 2, 1), -10, None))
        .await
        .unwrap();
    let dec = service
        .create(NewForecast::new(date(2023, 12, 31), 35, Some("Hot")))
        .await
        .unwrap();

    assert_ne!(jan.id, feb.id);
    assert_ne!(feb.id, dec.id);
    assert_eq!(jan.temperature_f(), 67);
    assert_eq!(feb.temperature_f(), 14);

    let listed = service.list().await.unwrap();
    assert_eq!(listed, vec![dec.clone(), jan.clone(), feb.clone()]);

    let replacement = jan.clone().replaced_with(NewForecast::new(date(2024, 3, 1), 5, None));
    service.update(replacement.clone()).await.unwrap();
    assert_eq!(service.get(jan.id).await.unwrap(), Some(replacement));

    assert!(service.delete(feb.id).await.unwrap());
    assert!(!service.delete(feb.id).await.unwrap());
    assert_eq!(service.get(feb.id).await.unwrap(), None);
    assert_eq!(service.list().await.unwrap().len(), 2);

    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn test_sqlite_lifecycle() {
    let dir = TempDir::new().unwrap();
    lifecycle(sqlite_factory(&dir)).await;
}

#[tokio::test]
async fn test_memory_lifecycle() {
    lifecycle(Arc::new(InMemoryContextFactory::new())).await;
}

#[tokio::test]
async fn test_sqlite_state_visible_across_service_instances() {
    let dir = TempDir::new().unwrap();
    let writer = ForecastService::new(sqlite_factory(&dir));
    let reader = ForecastService::new(sqlite_factory(&dir));

    let stored = writer
        .create(NewForecast::new(date(2024, 5, 5), 18, Some("Cool")))
        .await
        .unwrap();

    assert_eq!(reader.get(stored.id).await.unwrap(), Some(stored.clone()));

    writer.delete(stored.id).await.unwrap();
    assert!(reader.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sqlite_update_missing_id_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let factory = sqlite_factory(&dir);
    let service = ForecastService::new(factory.clone());

    let stored = service
        .create(NewForecast::new(date(2024, 1, 1), 1, None))
        .await
        .unwrap();

    let ghost = NewForecast::new(date(2030, 1, 1), 99, Some("Scorching")).with_id(ForecastId::new(42));
    assert!(matches!(service.update(ghost).await, Err(Error::NotFound(_))));
    assert_eq!(service.list().await.unwrap(), vec![stored]);
    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn test_sqlite_missing_store_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let factory = Arc::new(SqliteContextFactory::new(dir.path().join("absent.db")));
    let service = ForecastService::new(factory.clone());

    assert!(matches!(
        service.list().await,
        Err(Error::StoreUnavailable { .. })
    ));
    assert!(matches!(
        service.get(ForecastId::new(1)).await,
        Err(Error::StoreUnavailable { .. })
    ));
    assert!(!dir.path().join("absent.db").exists());
    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let service = ForecastService::new(sqlite_factory(&dir));

    let mut handles = Vec::new();
    for day in 1..=8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create(NewForecast::new(date(2024, 4, day), 10, None))
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(service.list().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_sqlite_and_memory_agree_on_order_across_eras() {
    let dir = TempDir::new().unwrap();
    let sqlite = ForecastService::new(sqlite_factory(&dir));
    let memory = ForecastService::new(Arc::new(InMemoryContextFactory::new()));

    for day in [date(2024, 1, 1), date(10_000, 1, 1), date(-2, 1, 1), date(-1, 1, 1)] {
        sqlite.create(NewForecast::new(day, 0, None)).await.unwrap();
        memory.create(NewForecast::new(day, 0, None)).await.unwrap();
    }

    let sqlite_dates: Vec<NaiveDate> = sqlite.list().await.unwrap().iter().map(|f| f.date).collect();
    let memory_dates: Vec<NaiveDate> = memory.list().await.unwrap().iter().map(|f| f.date).collect();

    assert_eq!(
        sqlite_dates,
        vec![date(-2, 1, 1), date(-1, 1, 1), date(2024, 1, 1), date(10_000, 1, 1)]
    );
    assert_eq!(sqlite_dates, memory_dates);
}
