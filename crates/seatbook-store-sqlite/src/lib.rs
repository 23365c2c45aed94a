//! SQLite backend for Seatbook.
//!
//! Implements the event store, attendee store and admission ledger over a
//! single database file. Wraps [`tokio_rusqlite`] so all database access runs
//! on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
