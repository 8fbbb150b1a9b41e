//! Text and JSON summaries printed after a run or a dry run.

use std::fmt::Write as _;

use dwh_core::{RunReport, entity::EntityKind, extract::Batch};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
  Text,
  Json,
}

/// `totals` holds the row count of each warehouse table after the run.
pub fn render_run(
  run: &RunReport,
  totals: &[(EntityKind, usize)],
  format: ReportFormat,
) -> anyhow::Result<String> {
  if format == ReportFormat::Json {
    let mut value = serde_json::to_value(run)?;
    value["totals"] = Value::Object(
      totals
        .iter()
        .map(|(kind, n)| (kind.table().to_owned(), json!(n)))
        .collect(),
    );
    return Ok(serde_json::to_string_pretty(&value)? + "\n");
  }

  let elapsed = run.finished_at - run.started_at;
  let mut out = String::new();
  writeln!(out, "run {} ({} ms)", run.run_id, elapsed.num_milliseconds())?;
  for load in &run.loads {
    let total = totals
      .iter()
      .find(|(kind, _)| *kind == load.kind)
      .map_or(0, |(_, n)| *n);
    writeln!(
      out,
      "  {:<12} {:>8} extracted {:>8} inserted {:>8} skipped {:>8} in table",
      load.kind.table(),
      load.extracted,
      load.inserted,
      load.skipped,
      total,
    )?;
  }
  Ok(out)
}

pub fn render_batch(batch: &Batch, format: ReportFormat) -> anyhow::Result<String> {
  if format == ReportFormat::Json {
    let counts: Map<String, Value> = batch
      .counts()
      .into_iter()
      .map(|(kind, n)| (kind.to_string(), json!(n)))
      .collect();
    return Ok(serde_json::to_string_pretty(&json!({ "extracted": counts }))? + "\n");
  }

  let mut out = String::new();
  for (kind, n) in batch.counts() {
    writeln!(out, "{kind:<9} {n:>8} rows")?;
  }
  Ok(out)
}
