//! `dwh`: copy the shop's transactional tables into the warehouse.
//!
//! Reads `dwh.toml` (or the path given with `--config`) plus `DWH_*`
//! environment variables, extracts customers, products, sales and orders from
//! the source database and loads whatever the warehouse does not hold yet.
//!
//! # Usage
//!
//! ```text
//! dwh --config dwh.toml
//! dwh --dry-run
//! DWH_SOURCE__DATABASE=shop.db DWH_WAREHOUSE__DATABASE=dwh.db dwh --init-warehouse
//! ```

mod report;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use dwh_core::{
  Pipeline, config::EtlConfig, entity::EntityKind, extract::extract_batch,
};
use dwh_store_sqlite::{SqliteSource, SqliteWarehouse};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use report::ReportFormat;

#[derive(Parser)]
#[command(author, version, about = "Load the shop database into the warehouse")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "dwh.toml")]
  config: PathBuf,

  /// Create the warehouse tables if they are missing before loading.
  #[arg(long)]
  init_warehouse: bool,

  /// Extract and print row counts without opening the warehouse.
  #[arg(long, conflicts_with = "init_warehouse")]
  dry_run: bool,

  /// Summary format printed on success.
  #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
  report: ReportFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries the summary.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;
  tracing::debug!(?cfg, "configuration loaded");

  let source = SqliteSource::new(cfg.source);

  if cli.dry_run {
    let batch = extract_batch(&source).await.context("extraction failed")?;
    print!("{}", report::render_batch(&batch, cli.report)?);
    return Ok(());
  }

  let warehouse = SqliteWarehouse::new(cfg.warehouse);
  if cli.init_warehouse {
    warehouse
      .init_schema()
      .await
      .context("failed to create warehouse tables")?;
  }

  let pipeline = Pipeline::new(source, warehouse);
  let run = pipeline.run().await.context("ETL run aborted")?;

  let mut totals = Vec::with_capacity(EntityKind::LOAD_ORDER.len());
  for kind in EntityKind::LOAD_ORDER {
    let rows = pipeline
      .warehouse()
      .row_count(kind)
      .await
      .with_context(|| format!("failed to count rows in {}", kind.table()))?;
    totals.push((kind, rows));
  }

  print!("{}", report::render_run(&run, &totals, cli.report)?);
  println!("ETL process completed successfully.");
  Ok(())
}

/// Layer the optional TOML file under `DWH_*` environment variables.
fn load_config(path: &Path) -> anyhow::Result<EtlConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("DWH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  parse_config(settings)
}

fn parse_config(settings: config::Config) -> anyhow::Result<EtlConfig> {
  let cfg: EtlConfig = settings
    .try_deserialize()
    .context("failed to deserialise EtlConfig")?;
  cfg.validate()?;
  Ok(cfg)
}
