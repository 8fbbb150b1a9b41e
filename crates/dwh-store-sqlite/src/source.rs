//! [`SqliteSource`]: the SQLite implementation of [`SourceStore`].

use dwh_core::{
  config::StoreConfig,
  entity::{Customer, Order, Product, Sale},
  store::SourceStore,
};

use crate::{
  connect::{is_file_path, open},
  encode::{RawLine, RawProduct},
  Error, Result,
};

// ─── Queries ─────────────────────────────────────────────────────────────────

const CUSTOMERS_SQL: &str = "
  SELECT u.id, u.username, u.email, MIN(o.delivery_address)
  FROM users u
  LEFT JOIN orders o ON u.id = o.user_id
  GROUP BY u.id, u.username, u.email
  ORDER BY u.id";

const PRODUCTS_SQL: &str = "
  SELECT p.id, p.name, s.name, c.name,
         CAST(p.price AS TEXT), p.availability_status
  FROM products p
  JOIN subcategories s ON p.subcategory_id = s.id
  JOIN categories c    ON s.category_id = c.id
  ORDER BY p.id";

const SALES_SQL: &str = "
  SELECT oi.id, o.id, oi.product_id, o.user_id, o.order_date,
         oi.quantity, CAST(oi.price AS TEXT)
  FROM order_items oi
  JOIN orders o ON oi.order_id = o.id
  ORDER BY oi.id";

// Same join driven from orders; line items of one order stay adjacent and in
// id order, so the first line is the one a load keeps.
const ORDERS_SQL: &str = "
  SELECT oi.id, o.id, oi.product_id, o.user_id, o.order_date,
         oi.quantity, CAST(oi.price AS TEXT)
  FROM orders o
  JOIN order_items oi ON o.id = oi.order_id
  ORDER BY o.id, oi.id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A read-only view of the transactional database.
///
/// Holds only configuration; each extraction opens its own connection and
/// drops it when done.
#[derive(Clone, Debug)]
pub struct SqliteSource {
  config: StoreConfig,
}

impl SqliteSource {
  pub fn new(config: StoreConfig) -> Self { Self { config } }

  /// Open a query-only connection. A missing database file is an error rather
  /// than a new empty database.
  async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    let database = &self.config.database;
    if is_file_path(database)
      && matches!(tokio::fs::try_exists(database).await, Ok(false))
    {
      return Err(Error::MissingDatabase(database.clone()));
    }

    let conn = open(&self.config).await?;
    conn
      .call(|conn| {
        conn.execute_batch("PRAGMA query_only = ON;")?;
        Ok(())
      })
      .await?;
    Ok(conn)
  }

  async fn query_lines(&self, sql: &'static str) -> Result<Vec<RawLine>> {
    let conn = self.connect().await?;

    let raws = conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLine {
              line_id:     row.get(0)?,
              order_id:    row.get(1)?,
              product_id:  row.get(2)?,
              customer_id: row.get(3)?,
              created_at:  row.get(4)?,
              quantity:    row.get(5)?,
              unit_price:  row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }
}

// ─── SourceStore impl ────────────────────────────────────────────────────────

impl SourceStore for SqliteSource {
  type Error = Error;

  async fn extract_customers(&self) -> Result<Vec<Customer>> {
    let conn = self.connect().await?;

    let customers = conn
      .call(|conn| {
        let mut stmt = conn.prepare(CUSTOMERS_SQL)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Customer {
              customer_id: row.get(0)?,
              name:        row.get(1)?,
              email:       row.get(2)?,
              address:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(customers)
  }

  async fn extract_products(&self) -> Result<Vec<Product>> {
    let conn = self.connect().await?;

    let raws: Vec<RawProduct> = conn
      .call(|conn| {
        let mut stmt = conn.prepare(PRODUCTS_SQL)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProduct {
              product_id:          row.get(0)?,
              name:                row.get(1)?,
              subcategory:         row.get(2)?,
              category:            row.get(3)?,
              price:               row.get(4)?,
              availability_status: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  async fn extract_sales(&self) -> Result<Vec<Sale>> {
    let raws = self.query_lines(SALES_SQL).await?;
    raws.into_iter().map(RawLine::into_sale).collect()
  }

  async fn extract_orders(&self) -> Result<Vec<Order>> {
    let raws = self.query_lines(ORDERS_SQL).await?;
    raws.into_iter().map(RawLine::into_order).collect()
  }
}
