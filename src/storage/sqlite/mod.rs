//! `SQLite` storage backend.
//!
//! ## Module Structure
//!
//! - [`connection`]: connection opening and per-connection configuration
//! - `context`: the session type, one connection each
//! - `factory`: [`SqliteContextFactory`], schema creation
//!
//! ## Concurrency
//!
//! Sessions never share a connection. Concurrent writers are serialized by
//! `SQLite` itself: WAL mode lets readers proceed alongside a single writer
//! and `busy_timeout` makes a blocked writer wait rather than fail.

pub mod connection;
mod context;
mod factory;

pub use connection::{BUSY_TIMEOUT, configure_connection};
pub use context::SqliteForecastContext;
pub use factory::SqliteContextFactory;
