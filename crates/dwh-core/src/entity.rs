//! Record types, the rows moved from the transactional store into the
//! warehouse.
//!
//! Each record is a flat struct of scalar fields. Records carry no behaviour
//! beyond naming their natural key and describing the warehouse row they
//! become; the [`EntityKind`] tag ties a record type to its destination table.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ─── Entity kind ─────────────────────────────────────────────────────────────

/// The four entity types replicated by a run.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Customer,
  Product,
  Sale,
  Order,
}

impl EntityKind {
  /// Fixed load order: dimensions before the facts that reference them.
  pub const LOAD_ORDER: [EntityKind; 4] =
    [Self::Customer, Self::Product, Self::Sale, Self::Order];

  /// Destination table name.
  pub fn table(self) -> &'static str {
    match self {
      Self::Customer => "Dim_Customer",
      Self::Product => "Dim_Product",
      Self::Sale => "Fact_Sales",
      Self::Order => "Fact_Orders",
    }
  }

  /// Natural-key column in the destination table.
  pub fn key_column(self) -> &'static str {
    match self {
      Self::Customer => "Customer_ID",
      Self::Product => "Product_ID",
      Self::Sale => "Sales_ID",
      Self::Order => "Order_ID",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Customer => "customer",
      Self::Product => "product",
      Self::Sale => "sale",
      Self::Order => "order",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

// ─── Extracted records ───────────────────────────────────────────────────────

/// A user of the shop, with the lowest-sorting delivery address among their
/// orders. `address` is `None` for users who never ordered.
///
/// Text columns are nullable in the source and are carried through as
/// `None` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub customer_id: i64,
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
}

/// A product with its subcategory and category names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub product_id:          i64,
  pub name:                Option<String>,
  pub subcategory:         Option<String>,
  pub category:            Option<String>,
  pub price:               Decimal,
  pub availability_status: bool,
}

/// One order line item, keyed by the line item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
  pub sales_id:      i64,
  pub product_id:    i64,
  pub customer_id:   i64,
  pub created_at:    DateTime<Utc>,
  pub quantity_sold: i64,
  /// Line unit price × quantity, computed at extraction.
  pub total_sales:   Decimal,
}

/// One order line item, keyed by the order id. An order with several line
/// items yields several records sharing an `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub order_id:       i64,
  pub product_id:     i64,
  pub customer_id:    i64,
  pub created_at:     DateTime<Utc>,
  pub order_quantity: i64,
  /// Line unit price × quantity, computed at extraction.
  pub order_total:    Decimal,
}

// ─── Warehouse rows ──────────────────────────────────────────────────────────

/// The `Dim_Customer` row written for a newly seen customer.
///
/// `end_date` and `is_current` are stamped once at insert and never revisited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDimension {
  pub customer_id: i64,
  pub name:        Option<String>,
  pub email:       Option<String>,
  pub start_date:  DateTime<Utc>,
  pub end_date:    Option<DateTime<Utc>>,
  pub is_current:  bool,
}

impl CustomerDimension {
  pub fn stamp(customer: &Customer, start_date: DateTime<Utc>) -> Self {
    Self {
      customer_id: customer.customer_id,
      name: customer.name.clone(),
      email: customer.email.clone(),
      start_date,
      end_date: None,
      is_current: true,
    }
  }
}

/// A row bound for one of the four warehouse tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseRow {
  Customer(CustomerDimension),
  Product(Product),
  Sale(Sale),
  Order(Order),
}

impl WarehouseRow {
  pub fn kind(&self) -> EntityKind {
    match self {
      Self::Customer(_) => EntityKind::Customer,
      Self::Product(_) => EntityKind::Product,
      Self::Sale(_) => EntityKind::Sale,
      Self::Order(_) => EntityKind::Order,
    }
  }

  pub fn natural_key(&self) -> i64 {
    match self {
      Self::Customer(c) => c.customer_id,
      Self::Product(p) => p.product_id,
      Self::Sale(s) => s.sales_id,
      Self::Order(o) => o.order_id,
    }
  }
}

// ─── Record trait ────────────────────────────────────────────────────────────

/// Common surface of the four extracted record types, used by the loader.
pub trait Record: Clone + Send + Sync {
  const KIND: EntityKind;

  fn natural_key(&self) -> i64;

  /// Build the warehouse row for this record. `loaded_at` is the timestamp
  /// of the load operation; only the customer dimension uses it.
  fn to_warehouse_row(&self, loaded_at: DateTime<Utc>) -> WarehouseRow;
}

impl Record for Customer {
  const KIND: EntityKind = EntityKind::Customer;

  fn natural_key(&self) -> i64 { self.customer_id }

  fn to_warehouse_row(&self, loaded_at: DateTime<Utc>) -> WarehouseRow {
    WarehouseRow::Customer(CustomerDimension::stamp(self, loaded_at))
  }
}

impl Record for Product {
  const KIND: EntityKind = EntityKind::Product;

  fn natural_key(&self) -> i64 { self.product_id }

  fn to_warehouse_row(&self, _: DateTime<Utc>) -> WarehouseRow {
    WarehouseRow::Product(self.clone())
  }
}

impl Record for Sale {
  const KIND: EntityKind = EntityKind::Sale;

  fn natural_key(&self) -> i64 { self.sales_id }

  fn to_warehouse_row(&self, _: DateTime<Utc>) -> WarehouseRow {
    WarehouseRow::Sale(self.clone())
  }
}

impl Record for Order {
  const KIND: EntityKind = EntityKind::Order;

  fn natural_key(&self) -> i64 { self.order_id }

  fn to_warehouse_row(&self, _: DateTime<Utc>) -> WarehouseRow {
    WarehouseRow::Order(self.clone())
  }
}

// ─── Line totals ─────────────────────────────────────────────────────────────

/// `unit_price × quantity`, or `None` on decimal overflow.
pub fn line_total(unit_price: Decimal, quantity: i64) -> Option<Decimal> {
  unit_price.checked_mul(Decimal::from(quantity))
}
