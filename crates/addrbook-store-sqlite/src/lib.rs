//! SQLite backend for the addrbook contact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::{LATEST_VERSION, MIGRATIONS, Migration};
pub use store::SqliteStore;
