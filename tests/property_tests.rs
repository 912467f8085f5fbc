//! Property-based tests for the forecast store.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Created forecasts receive distinct ids
//! - Listing is always in ascending date order
//! - Deleting twice is the same as deleting once
//! - Fahrenheit conversion truncates toward zero

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{Days, NaiveDate};
use forecasts::storage::{ContextFactory, InMemoryContextFactory};
use forecasts::{ForecastService, NewForecast, WeatherForecast};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn draft_strategy() -> impl Strategy<Value = NewForecast> {
    (0u64..3650, -60i32..60, proptest::option::of("[A-Za-z]{0,12}")).prop_map(
        |(offset, temperature_c, summary)| {
            let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            let date = base.checked_add_days(Days::new(offset)).unwrap();
            NewForecast::new(date, temperature_c, summary.as_deref())
        },
    )
}

fn create_all(service: &ForecastService, drafts: Vec<NewForecast>) -> Vec<WeatherForecast> {
    runtime().block_on(async {
        let mut stored = Vec::new();
        for draft in drafts {
            stored.push(service.create(draft).await.unwrap());
        }
        stored
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every created forecast gets a distinct id.
    #[test]
    fn prop_created_ids_are_unique(drafts in prop::collection::vec(draft_strategy(), 1..20)) {
        let service = ForecastService::new(Arc::new(InMemoryContextFactory::new()));
        let count = drafts.len();
        let stored = create_all(&service, drafts);

        let ids: HashSet<_> = stored.iter().map(|f| f.id).collect();
        prop_assert_eq!(ids.len(), count);
    }

    /// Property: listing is sorted by date and returns every forecast.
    #[test]
    fn prop_list_is_date_ordered(drafts in prop::collection::vec(draft_strategy(), 0..20)) {
        let service = ForecastService::new(Arc::new(InMemoryContextFactory::new()));
        let count = drafts.len();
        create_all(&service, drafts);

        let listed = runtime().block_on(service.list()).unwrap();
        prop_assert_eq!(listed.len(), count);
        prop_assert!(listed.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    /// Property: a second delete of the same id changes nothing.
    #[test]
    fn prop_delete_is_idempotent(
        drafts in prop::collection::vec(draft_strategy(), 1..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let factory = Arc::new(InMemoryContextFactory::new());
        let service = ForecastService::new(factory.clone());
        let stored = create_all(&service, drafts);
        let target = stored[pick.index(stored.len())].id;

        let rt = runtime();
        prop_assert!(rt.block_on(service.delete(target)).unwrap());
        let after_first = rt.block_on(service.list()).unwrap();
        prop_assert!(!rt.block_on(service.delete(target)).unwrap());
        let after_second = rt.block_on(service.list()).unwrap();

        prop_assert_eq!(after_first, after_second);
        prop_assert_eq!(factory.open_sessions(), 0);
    }

    /// Property: Fahrenheit is 32 + C / 0.5556 truncated toward zero.
    ///
    /// The expected value uses exact integer arithmetic (C * 10000 / 5556,
    /// which Rust truncates toward zero) rather than floating point.
    #[test]
    fn prop_temperature_f_truncates(temperature_c in -273i32..1000) {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let forecast = NewForecast::new(date, temperature_c, None).with_id(1.into());
        let quotient = i64::from(temperature_c) * 10_000 / 5_556;
        let expected = 32 + i32::try_from(quotient).unwrap();
        prop_assert_eq!(forecast.temperature_f(), expected);
        if temperature_c < 0 {
            prop_assert!(forecast.temperature_f() <= 32);
        }
    }
}
