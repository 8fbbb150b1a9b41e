//! One full [`Pipeline`] run: extract everything, then load everything.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  extract::{Batch, extract_batch},
  load::{LoadReport, load_entity},
  store::{SourceStore, WarehouseStore},
  Result,
};

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub run_id:      Uuid,
  pub started_at:  DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  /// One entry per entity, in load order.
  pub loads:       Vec<LoadReport>,
}

impl RunReport {
  pub fn inserted(&self) -> usize { self.loads.iter().map(|l| l.inserted).sum() }

  pub fn skipped(&self) -> usize { self.loads.iter().map(|l| l.skipped).sum() }
}

/// Load every row set of `batch`, customers → products → sales → orders.
///
/// Each entity gets its own warehouse connection. No foreign keys are checked
/// here; the warehouse's own constraints, if any, catch ordering problems.
pub async fn load_batch<W: WarehouseStore>(
  warehouse: &W,
  batch: &Batch,
) -> Result<Vec<LoadReport>> {
  Ok(vec![
    load_entity(warehouse, &batch.customers).await?,
    load_entity(warehouse, &batch.products).await?,
    load_entity(warehouse, &batch.sales).await?,
    load_entity(warehouse, &batch.orders).await?,
  ])
}

/// A source/warehouse pair.
pub struct Pipeline<S, W> {
  source:    S,
  warehouse: W,
}

impl<S, W> Pipeline<S, W>
where
  S: SourceStore,
  W: WarehouseStore,
{
  pub fn new(source: S, warehouse: W) -> Self { Self { source, warehouse } }

  pub fn warehouse(&self) -> &W { &self.warehouse }

  /// Extract all four entity types without touching the warehouse.
  pub async fn extract(&self) -> Result<Batch> { extract_batch(&self.source).await }

  /// Run to completion. Any error aborts the run; whatever was inserted
  /// before it stays, and a re-run picks up from there.
  pub async fn run(&self) -> Result<RunReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::info!(%run_id, "starting run");

    let batch = self.extract().await?;
    if batch.is_empty() {
      tracing::warn!(%run_id, "source returned no rows");
    }
    let loads = load_batch(&self.warehouse, &batch).await?;

    let report = RunReport { run_id, started_at, finished_at: Utc::now(), loads };
    tracing::info!(
      %run_id,
      inserted = report.inserted(),
      skipped = report.skipped(),
      "run finished"
    );
    Ok(report)
  }
}
