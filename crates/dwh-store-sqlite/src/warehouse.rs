//! [`SqliteWarehouse`]: the SQLite implementation of [`WarehouseStore`].

use dwh_core::{
  config::StoreConfig,
  entity::{EntityKind, WarehouseRow},
  store::{WarehouseConn, WarehouseStore},
};
use rusqlite::OptionalExtension as _;

use crate::{
  connect::open,
  encode::{encode_decimal, encode_dt},
  schema::WAREHOUSE_SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The dimensional database. Holds only configuration; every load operation
/// gets its own [`SqliteWarehouseConn`].
#[derive(Clone, Debug)]
pub struct SqliteWarehouse {
  config: StoreConfig,
}

impl SqliteWarehouse {
  pub fn new(config: StoreConfig) -> Self { Self { config } }

  /// Create the four warehouse tables if they do not exist yet.
  pub async fn init_schema(&self) -> Result<()> {
    let conn = open(&self.config).await?;
    conn
      .call(|conn| {
        conn.execute_batch(WAREHOUSE_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows currently in `kind`'s table.
  pub async fn row_count(&self, kind: EntityKind) -> Result<usize> {
    let conn = open(&self.config).await?;
    let sql = format!("SELECT COUNT(*) FROM {}", kind.table());

    let count: i64 = conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;

    Ok(count.try_into().unwrap_or_default())
  }
}

impl WarehouseStore for SqliteWarehouse {
  type Error = Error;
  type Conn = SqliteWarehouseConn;

  async fn connect(&self) -> Result<SqliteWarehouseConn> {
    Ok(SqliteWarehouseConn { conn: open(&self.config).await? })
  }
}

// ─── Connection ──────────────────────────────────────────────────────────────

/// One open warehouse connection; closed on drop.
pub struct SqliteWarehouseConn {
  conn: tokio_rusqlite::Connection,
}

impl WarehouseConn for SqliteWarehouseConn {
  type Error = Error;

  async fn exists(&self, kind: EntityKind, key: i64) -> Result<bool> {
    let sql = format!(
      "SELECT 1 FROM {} WHERE {} = ?1",
      kind.table(),
      kind.key_column()
    );

    let found = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [key], |_| Ok(())).optional()?))
      .await?;

    Ok(found.is_some())
  }

  async fn insert(&self, row: WarehouseRow) -> Result<()> {
    match row {
      WarehouseRow::Customer(c) => {
        let start_date = encode_dt(c.start_date);
        let end_date   = c.end_date.map(encode_dt);

        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO Dim_Customer
                 (Customer_ID, Name, Email, StartDate, EndDate, IsCurrent)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                c.customer_id,
                c.name,
                c.email,
                start_date,
                end_date,
                c.is_current,
              ],
            )?;
            Ok(())
          })
          .await?;
      }

      WarehouseRow::Product(p) => {
        let price = encode_decimal(p.price);

        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO Dim_Product
                 (Product_ID, Name, Subcategory, Category, Price)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![p.product_id, p.name, p.subcategory, p.category, price],
            )?;
            Ok(())
          })
          .await?;
      }

      WarehouseRow::Sale(s) => {
        let created_at  = encode_dt(s.created_at);
        let total_sales = encode_decimal(s.total_sales);

        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO Fact_Sales
                 (Sales_ID, Product_ID, Customer_ID, CreatedAt, Quantity_Sold, Total_Sales)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                s.sales_id,
                s.product_id,
                s.customer_id,
                created_at,
                s.quantity_sold,
                total_sales,
              ],
            )?;
            Ok(())
          })
          .await?;
      }

      WarehouseRow::Order(o) => {
        let created_at  = encode_dt(o.created_at);
        let order_total = encode_decimal(o.order_total);

        self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO Fact_Orders
                 (Order_ID, Product_ID, Customer_ID, CreatedAt, Order_Quantity, Order_Total)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                o.order_id,
                o.product_id,
                o.customer_id,
                created_at,
                o.order_quantity,
                order_total,
              ],
            )?;
            Ok(())
          })
          .await?;
      }
    }

    Ok(())
  }
}
