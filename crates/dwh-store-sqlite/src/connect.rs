//! Opening a connection from a [`StoreConfig`].

use dwh_core::config::StoreConfig;

use crate::{Error, Result};

/// Open `config.database` and apply per-connection settings.
///
/// `database` may be a file path or an SQLite URI (`file:…`). Host and
/// credentials have no meaning for SQLite and are ignored.
pub(crate) async fn open(config: &StoreConfig) -> Result<tokio_rusqlite::Connection> {
  if config.has_remote_options() {
    tracing::debug!(
      database = %config.database,
      "host/username/password are not used by the SQLite backend"
    );
  }

  let conn = tokio_rusqlite::Connection::open(config.database.clone())
    .await
    .map_err(|source| Error::Connect { database: config.database.clone(), source })?;

  if let Some(timeout) = config.busy_timeout() {
    conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;
  }

  Ok(conn)
}

/// Whether `database` names a file on disk rather than a URI or the
/// anonymous in-memory database.
pub(crate) fn is_file_path(database: &str) -> bool {
  database != ":memory:" && !database.starts_with("file:")
}
