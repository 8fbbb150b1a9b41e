//! Store connection settings, deserialised by the binary from `dwh.toml` and
//! `DWH_*` environment variables.

use std::{fmt, time::Duration};

use serde::Deserialize;

use crate::{Error, Result};

/// Connection settings for one store.
///
/// `host`, `username` and `password` describe a networked database; backends
/// that address a local file use only `database`.
#[derive(Deserialize, Clone, Default)]
pub struct StoreConfig {
  #[serde(default)]
  pub host:            Option<String>,
  #[serde(default)]
  pub username:        Option<String>,
  #[serde(default)]
  pub password:        Option<String>,
  pub database:        String,
  /// Per-connection statement busy timeout.
  #[serde(default)]
  pub busy_timeout_ms: Option<u64>,
}

impl StoreConfig {
  pub fn new(database: impl Into<String>) -> Self {
    Self { database: database.into(), ..Self::default() }
  }

  pub fn busy_timeout(&self) -> Option<Duration> {
    self.busy_timeout_ms.map(Duration::from_millis)
  }

  /// Whether any networked-database option is set.
  pub fn has_remote_options(&self) -> bool {
    self.host.is_some() || self.username.is_some() || self.password.is_some()
  }

  fn validate(&self, name: &str) -> Result<()> {
    if self.database.trim().is_empty() {
      return Err(Error::Config(format!("{name}.database must not be empty")));
    }
    Ok(())
  }
}

impl fmt::Debug for StoreConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoreConfig")
      .field("host", &self.host)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("database", &self.database)
      .field("busy_timeout_ms", &self.busy_timeout_ms)
      .finish()
  }
}

/// Settings for a whole run: where to read from and where to write to.
#[derive(Debug, Deserialize, Clone)]
pub struct EtlConfig {
  pub source:    StoreConfig,
  pub warehouse: StoreConfig,
}

impl EtlConfig {
  pub fn validate(&self) -> Result<()> {
    self.source.validate("source")?;
    self.warehouse.validate("warehouse")?;
    Ok(())
  }
}
