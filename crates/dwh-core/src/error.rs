//! Error types for `dwh-core`.

use thiserror::Error;

use crate::entity::EntityKind;

/// A boxed backend error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Connecting to or querying the source store failed.
  #[error("failed to extract {kind} rows from the source store")]
  Source {
    kind:   EntityKind,
    #[source]
    source: BoxError,
  },

  /// Connecting to, checking, or inserting into the warehouse failed.
  #[error("failed to load {kind} rows into the warehouse")]
  Warehouse {
    kind:   EntityKind,
    #[source]
    source: BoxError,
  },

  #[error("invalid configuration: {0}")]
  Config(String),
}

impl Error {
  pub fn extraction<E>(kind: EntityKind, err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Source { kind, source: Box::new(err) }
  }

  pub fn loading<E>(kind: EntityKind, err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Warehouse { kind, source: Box::new(err) }
  }

  /// The entity whose extraction or load failed, if any.
  pub fn kind(&self) -> Option<EntityKind> {
    match self {
      Self::Source { kind, .. } | Self::Warehouse { kind, .. } => Some(*kind),
      Self::Config(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
