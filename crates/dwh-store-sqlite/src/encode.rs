//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Money travels as decimal text in both directions: the extractor reads
//! prices with `CAST(.. AS TEXT)` and the warehouse stores canonical decimal
//! strings. Warehouse timestamps are RFC 3339 strings.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dwh_core::entity::{Order, Product, Sale, line_total};
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Naive layouts SQLite's date functions produce; read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S",
];

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DD HH:MM:SS[.fff]`
/// timestamp, or a bare `YYYY-MM-DD` date (midnight).
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  for fmt in NAIVE_DATETIME_FORMATS {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> {
  let s = s.trim();
  match Decimal::from_str(s) {
    Ok(d) => Ok(d),
    Err(_) => Ok(Decimal::from_scientific(s)?),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `products ⋈ subcategories ⋈ categories` row.
pub struct RawProduct {
  pub product_id:          i64,
  pub name:                Option<String>,
  pub subcategory:         Option<String>,
  pub category:            Option<String>,
  pub price:               String,
  pub availability_status: bool,
}

impl RawProduct {
  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      product_id:          self.product_id,
      name:                self.name,
      subcategory:         self.subcategory,
      category:            self.category,
      price:               decode_decimal(&self.price)?,
      availability_status: self.availability_status,
    })
  }
}

/// Raw values read from an `order_items ⋈ orders` row. Sales and orders are
/// both built from it; only the key differs.
pub struct RawLine {
  pub line_id:     i64,
  pub order_id:    i64,
  pub product_id:  i64,
  pub customer_id: i64,
  pub created_at:  String,
  pub quantity:    i64,
  pub unit_price:  String,
}

impl RawLine {
  fn total(&self) -> Result<Decimal> {
    let price = decode_decimal(&self.unit_price)?;
    line_total(price, self.quantity).ok_or(Error::Overflow(self.line_id))
  }

  pub fn into_sale(self) -> Result<Sale> {
    Ok(Sale {
      sales_id:      self.line_id,
      product_id:    self.product_id,
      customer_id:   self.customer_id,
      created_at:    decode_dt(&self.created_at)?,
      quantity_sold: self.quantity,
      total_sales:   self.total()?,
    })
  }

  pub fn into_order(self) -> Result<Order> {
    Ok(Order {
      order_id:       self.order_id,
      product_id:     self.product_id,
      customer_id:    self.customer_id,
      created_at:     decode_dt(&self.created_at)?,
      order_quantity: self.quantity,
      order_total:    self.total()?,
    })
  }
}
