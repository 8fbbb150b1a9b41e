//! The `SourceStore` and `WarehouseStore` traits.
//!
//! Storage backends (e.g. `dwh-store-sqlite`) implement these. The extractor,
//! loader and pipeline depend only on the traits.

use std::future::Future;

use crate::entity::{Customer, EntityKind, Order, Product, Sale, WarehouseRow};

// ─── Source ──────────────────────────────────────────────────────────────────

/// Read-only access to the transactional store.
///
/// Every method is one full extraction: it opens its own connection, runs a
/// single query, and releases the connection before returning, on success
/// or failure alike. No method writes to the store.
pub trait SourceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every user, with the minimum delivery address over their orders.
  fn extract_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Every product that has both a subcategory and a category.
  fn extract_products(
    &self,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  /// One record per order line item, keyed by line item.
  fn extract_sales(
    &self,
  ) -> impl Future<Output = Result<Vec<Sale>, Self::Error>> + Send + '_;

  /// One record per order line item, keyed by order.
  fn extract_orders(
    &self,
  ) -> impl Future<Output = Result<Vec<Order>, Self::Error>> + Send + '_;
}

// ─── Warehouse ───────────────────────────────────────────────────────────────

/// The dimensional store the loader writes into.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
  type Conn: WarehouseConn<Error = Self::Error>;

  /// Open a connection for one load operation. The connection is released
  /// when the returned value is dropped.
  fn connect(
    &self,
  ) -> impl Future<Output = Result<Self::Conn, Self::Error>> + Send + '_;
}

/// One open warehouse connection.
///
/// Each call is its own implicit unit of work; nothing spans two calls.
pub trait WarehouseConn: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether `kind`'s table already holds a row with natural key `key`.
  fn exists(
    &self,
    kind: EntityKind,
    key: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert `row` into its table. Fails if the key is already present.
  fn insert(
    &self,
    row: WarehouseRow,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
