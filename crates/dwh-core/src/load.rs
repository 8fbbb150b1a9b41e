//! The idempotent loader: insert every record whose natural key is not yet in
//! the warehouse, skip the rest.
//!
//! Existing rows are never compared or updated. Re-running a load with the
//! same records writes nothing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  entity::{EntityKind, Record},
  store::{WarehouseConn, WarehouseStore},
  Error, Result,
};

/// Outcome of loading one entity's row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
  pub kind:      EntityKind,
  /// Rows handed to the loader.
  pub extracted: usize,
  pub inserted:  usize,
  /// Rows whose key was already present.
  pub skipped:   usize,
}

impl LoadReport {
  pub fn new(kind: EntityKind, extracted: usize) -> Self {
    Self { kind, extracted, inserted: 0, skipped: 0 }
  }
}

/// Load `rows` over an already-open connection.
///
/// For each row: look the natural key up, insert the row if absent. The first
/// failing check or insert aborts the load; rows inserted before it stay.
pub async fn load_rows<C, R>(
  conn: &C,
  rows: &[R],
  loaded_at: DateTime<Utc>,
) -> Result<LoadReport, C::Error>
where
  C: WarehouseConn,
  R: Record,
{
  let mut report = LoadReport::new(R::KIND, rows.len());

  for row in rows {
    let key = row.natural_key();
    if conn.exists(R::KIND, key).await? {
      tracing::debug!(entity = %R::KIND, key, "already present; skipping");
      report.skipped += 1;
      continue;
    }

    conn.insert(row.to_warehouse_row(loaded_at)).await?;
    tracing::debug!(entity = %R::KIND, key, "inserted");
    report.inserted += 1;
  }

  Ok(report)
}

/// Load one entity's row set: open a connection, load, release it.
///
/// A single `loaded_at` timestamp is taken per call and stamped on every
/// customer dimension row it inserts.
pub async fn load_entity<W, R>(warehouse: &W, rows: &[R]) -> Result<LoadReport>
where
  W: WarehouseStore,
  R: Record,
{
  let conn = warehouse
    .connect()
    .await
    .map_err(|e| Error::loading(R::KIND, e))?;

  let report = load_rows(&conn, rows, Utc::now())
    .await
    .map_err(|e| Error::loading(R::KIND, e))?;

  tracing::info!(
    entity = %report.kind,
    inserted = report.inserted,
    skipped = report.skipped,
    "loaded"
  );
  Ok(report)
}
