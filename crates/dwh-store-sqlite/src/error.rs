//! Error type for `dwh-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The database could not be opened.
  #[error("cannot connect to {database:?}")]
  Connect {
    database: String,
    #[source]
    source:   tokio_rusqlite::Error,
  },

  /// The source database file does not exist; it is never created.
  #[error("source database {0:?} does not exist")]
  MissingDatabase(String),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// `unit_price × quantity` does not fit in a decimal.
  #[error("line total overflows for line item {0}")]
  Overflow(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
