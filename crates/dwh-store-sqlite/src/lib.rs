//! SQLite backend for the dwh warehouse loader.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. [`SqliteSource`] reads the
//! transactional tables; [`SqliteWarehouse`] writes the dimension and fact
//! tables.

mod connect;
mod encode;
mod source;
mod warehouse;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use source::SqliteSource;
pub use warehouse::{SqliteWarehouse, SqliteWarehouseConn};

#[cfg(test)]
mod tests;
