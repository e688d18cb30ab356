//! SQLite backend for the EnergyFlow record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That thread executes one call at a
//! time, and every store operation is a single call, so read-then-write
//! operations never interleave.

mod encode;
mod merge;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
