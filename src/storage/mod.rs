//! Storage layer.
//!
//! Forecasts are reached only through a [`ContextFactory`], which hands out a
//! fresh [`ForecastContext`] session per unit of work. Two backends exist:
//!
//! | Backend | Factory | Session |
//! |---------|---------|---------|
//! | `SQLite` | [`SqliteContextFactory`] | one connection, closed on drop |
//! | Memory | [`InMemoryContextFactory`] | shared table behind an `RwLock` |

#![allow(clippy::significant_drop_tightening)]

mod memory;
pub mod metrics;
pub mod session;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryContextFactory;
pub use session::{SessionCounter, SessionGuard};
pub use sqlite::SqliteContextFactory;
pub use traits::{ContextFactory, ForecastContext, PendingChange, SavedChange};

use crate::config::{ForecastsConfig, StorageBackendType};
use std::sync::Arc;

/// Builds the context factory selected by configuration.
#[must_use]
pub fn factory_from_config(config: &ForecastsConfig) -> Arc<dyn ContextFactory> {
    match config.storage.backend {
        StorageBackendType::Sqlite => Arc::new(SqliteContextFactory::new(config.storage.path.clone())),
        StorageBackendType::Memory => Arc::new(InMemoryContextFactory::new()),
    }
}
