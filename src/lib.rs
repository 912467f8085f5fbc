//! # Forecasts
//!
//! CRUD over weather forecasts using one short-lived storage session per
//! operation.
//!
//! Every [`ForecastService`] call asks a [`ContextFactory`] for a fresh
//! session, performs a single unit of work against it, and drops the session
//! before returning. Nothing is cached between calls; a long-lived caller such
//! as the HTML UI never holds a connection open across interactions.
//!
//! ## Features
//!
//! - `SQLite` persistence with one connection per session
//! - In-memory backend for tests and throwaway runs
//! - Server-rendered HTML UI (`http` feature, on by default)
//! - CLI covering every service operation
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use forecasts::{ForecastService, NewForecast};
//! use forecasts::storage::SqliteContextFactory;
//!
//! let factory = SqliteContextFactory::new("forecasts.db");
//! factory.ensure_created()?;
//! let service = ForecastService::new(Arc::new(factory));
//!
//! let stored = service.create(NewForecast::new(date, 20, Some("Mild"))).await?;
//! assert!(service.get(stored.id).await?.is_some());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod services;
pub mod storage;
#[cfg(feature = "http")]
pub mod web;

pub use config::{ForecastsConfig, StorageBackendType};
pub use models::{ForecastId, NewForecast, SUMMARY_LABELS, WeatherForecast};
pub use services::ForecastService;
pub use storage::{ContextFactory, ForecastContext, SavedChange};

/// Error type for forecast operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unparseable date, temperature, or id from the CLI or a form |
/// | `StoreUnavailable` | A storage session cannot be opened |
/// | `NotFound` | Updating a forecast id that has no stored record |
/// | `OperationFailed` | Queries or commits fail, config/I/O errors, a worker task dies |
/// | `FeatureNotEnabled` | Serving the UI from a build without the `http` feature |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session against the backing store could not be acquired.
    ///
    /// Raised when:
    /// - The database file or its parent directory cannot be opened
    /// - The in-memory store has been marked unavailable
    #[error("store unavailable at '{location}': {cause}")]
    StoreUnavailable {
        /// Where the store lives (file path or `memory`).
        location: String,
        /// The underlying cause.
        cause: String,
    },

    /// A record addressed by a write does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` statements or commits fail (including constraint violations)
    /// - Configuration files cannot be read or parsed
    /// - A blocking worker task panics or is cancelled
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("bad date".to_string());
        assert_eq!(err.to_string(), "invalid input: bad date");

        let err = Error::OperationFailed {
            operation: "save_changes".to_string(),
            cause: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'save_changes' failed: disk full");

        let err = Error::StoreUnavailable {
            location: "/nope/forecasts.db".to_string(),
            cause: "unable to open database file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "store unavailable at '/nope/forecasts.db': unable to open database file"
        );

        let err = Error::NotFound("forecast 7".to_string());
        assert_eq!(err.to_string(), "not found: forecast 7");
    }
}
