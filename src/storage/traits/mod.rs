//! Storage backend traits.

mod context;

pub use context::{ContextFactory, ForecastContext, PendingChange, SavedChange};
