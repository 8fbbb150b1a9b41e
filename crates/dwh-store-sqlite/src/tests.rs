//! Integration tests for `SqliteSource` and `SqliteWarehouse` against
//! shared-cache in-memory databases.
//!
//! Each test names its databases with a fresh UUID and keeps one plain
//! `rusqlite` connection open for its whole duration, so the in-memory
//! database outlives the per-operation connections opened by the stores.

use chrono::{DateTime, TimeZone as _, Utc};
use dwh_core::{
  Pipeline,
  config::StoreConfig,
  entity::{EntityKind, WarehouseRow},
  extract::extract_batch,
  load::load_entity,
  store::{SourceStore, WarehouseConn, WarehouseStore},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
  Error, SqliteSource, SqliteWarehouse,
  schema::{SOURCE_SCHEMA, WAREHOUSE_SCHEMA},
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// An in-memory database kept alive by `keep`.
struct MemoryDb {
  keep: rusqlite::Connection,
  uri:  String,
}

impl MemoryDb {
  fn new(label: &str, ddl: &str) -> Self {
    let uri = format!("file:{label}-{}?mode=memory&cache=shared", Uuid::new_v4());
    let keep = rusqlite::Connection::open(&uri).expect("open in-memory db");
    keep.execute_batch(ddl).expect("apply ddl");
    Self { keep, uri }
  }

  fn config(&self) -> StoreConfig { StoreConfig::new(self.uri.clone()) }

  fn exec(&self, sql: &str) { self.keep.execute_batch(sql).expect("seed"); }
}

fn source_db() -> MemoryDb { MemoryDb::new("src", SOURCE_SCHEMA) }

fn warehouse_db() -> MemoryDb { MemoryDb::new("dwh", WAREHOUSE_SCHEMA) }

const ALICE_ONLY: &str = "
  INSERT INTO users (id, username, email) VALUES (1, 'alice', 'a@x.com');
";

/// Alice, one kettle, one order with one line of three kettles.
const ONE_ORDER: &str = "
  INSERT INTO users (id, username, email) VALUES (1, 'alice', 'a@x.com');
  INSERT INTO categories (id, name) VALUES (1, 'Kitchen');
  INSERT INTO subcategories (id, name, category_id) VALUES (1, 'Kettles', 1);
  INSERT INTO products (id, name, price, availability_status, subcategory_id)
    VALUES (1, 'Kettle', '10.00', 1, 1);
  INSERT INTO orders (id, user_id, order_date, delivery_address)
    VALUES (1, 1, '2024-01-05 10:00:00', '1 Main St');
  INSERT INTO order_items (id, order_id, product_id, quantity, price)
    VALUES (1, 1, 1, 3, '10.00');
";

fn order_date() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap() }

// ─── Extraction ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn customer_without_orders_has_no_address() {
  let db = source_db();
  db.exec(ALICE_ONLY);

  let customers = SqliteSource::new(db.config()).extract_customers().await.unwrap();
  assert_eq!(customers.len(), 1);
  let alice = &customers[0];
  assert_eq!(alice.customer_id, 1);
  assert_eq!(alice.name.as_deref(), Some("alice"));
  assert_eq!(alice.email.as_deref(), Some("a@x.com"));
  assert!(alice.address.is_none());
}

#[tokio::test]
async fn customer_address_is_minimum_over_orders() {
  let db = source_db();
  db.exec(
    "INSERT INTO users (id, username, email) VALUES (1, 'alice', 'a@x.com');
     INSERT INTO users (id, username, email) VALUES (2, 'bob', 'b@x.com');
     INSERT INTO orders (id, user_id, order_date, delivery_address)
       VALUES (1, 1, '2024-01-05', 'B Street'),
              (2, 1, '2024-01-06', 'A Street'),
              (3, 1, '2024-01-07', NULL);",
  );

  let customers = SqliteSource::new(db.config()).extract_customers().await.unwrap();
  assert_eq!(customers.len(), 2, "one row per user despite several orders");
  assert_eq!(customers[0].address.as_deref(), Some("A Street"));
  assert!(customers[1].address.is_none());
}

#[tokio::test]
async fn products_need_subcategory_and_category() {
  let db = source_db();
  db.exec(
    "INSERT INTO categories (id, name) VALUES (1, 'Kitchen');
     INSERT INTO subcategories (id, name, category_id) VALUES (1, 'Kettles', 1);
     INSERT INTO subcategories (id, name, category_id) VALUES (2, 'Orphans', NULL);
     INSERT INTO products (id, name, price, availability_status, subcategory_id)
       VALUES (1, 'Kettle', '19.99', 0, 1),
              (2, 'Loose', '5.00', 1, NULL),
              (3, 'Stray', '7.50', 1, 2);",
  );

  let products = SqliteSource::new(db.config()).extract_products().await.unwrap();
  assert_eq!(products.len(), 1);
  let kettle = &products[0];
  assert_eq!(kettle.product_id, 1);
  assert_eq!(kettle.subcategory.as_deref(), Some("Kettles"));
  assert_eq!(kettle.category.as_deref(), Some("Kitchen"));
  assert_eq!(kettle.price, Decimal::new(1999, 2));
  assert!(!kettle.availability_status);
}

#[tokio::test]
async fn null_source_text_is_carried_into_the_warehouse() {
  let src = source_db();
  src.exec(
    "INSERT INTO users (id, username, email) VALUES (1, 'bob', NULL);
     INSERT INTO categories (id, name) VALUES (1, NULL);
     INSERT INTO subcategories (id, name, category_id) VALUES (1, 'Kettles', 1);
     INSERT INTO products (id, name, price, availability_status, subcategory_id)
       VALUES (1, NULL, '4.00', 1, 1);",
  );
  let source = SqliteSource::new(src.config());

  let customers = source.extract_customers().await.unwrap();
  assert_eq!(customers[0].name.as_deref(), Some("bob"));
  assert!(customers[0].email.is_none());

  let products = source.extract_products().await.unwrap();
  assert!(products[0].name.is_none());
  assert!(products[0].category.is_none());

  let dwh = warehouse_db();
  let warehouse = SqliteWarehouse::new(dwh.config());
  assert_eq!(load_entity(&warehouse, &customers).await.unwrap().inserted, 1);
  assert_eq!(load_entity(&warehouse, &products).await.unwrap().inserted, 1);

  let email: Option<String> = dwh
    .keep
    .query_row("SELECT Email FROM Dim_Customer WHERE Customer_ID = 1", [], |r| r.get(0))
    .unwrap();
  assert!(email.is_none());
  let category: Option<String> = dwh
    .keep
    .query_row("SELECT Category FROM Dim_Product WHERE Product_ID = 1", [], |r| r.get(0))
    .unwrap();
  assert!(category.is_none());
}

#[tokio::test]
async fn line_totals_are_price_times_quantity() {
  let db = source_db();
  db.exec(ONE_ORDER);
  let source = SqliteSource::new(db.config());

  let sales = source.extract_sales().await.unwrap();
  assert_eq!(sales.len(), 1);
  assert_eq!(sales[0].sales_id, 1);
  assert_eq!(sales[0].customer_id, 1);
  assert_eq!(sales[0].created_at, order_date());
  assert_eq!(sales[0].quantity_sold, 3);
  assert_eq!(sales[0].total_sales, Decimal::new(3000, 2));

  let orders = source.extract_orders().await.unwrap();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].order_id, 1);
  assert_eq!(orders[0].order_quantity, 3);
  assert_eq!(orders[0].order_total, Decimal::new(3000, 2));
}

#[tokio::test]
async fn fractional_prices_multiply_exactly() {
  let db = source_db();
  db.exec(ONE_ORDER);
  db.exec(
    "INSERT INTO order_items (id, order_id, product_id, quantity, price)
       VALUES (2, 1, 1, 3, '0.10');",
  );

  let sales = SqliteSource::new(db.config()).extract_sales().await.unwrap();
  assert_eq!(sales[1].total_sales, Decimal::new(30, 2));
}

#[tokio::test]
async fn orders_yield_one_row_per_line_item() {
  let db = source_db();
  db.exec(ONE_ORDER);
  db.exec(
    "INSERT INTO products (id, name, price, availability_status, subcategory_id)
       VALUES (2, 'Teapot', '25.00', 1, 1);
     INSERT INTO order_items (id, order_id, product_id, quantity, price)
       VALUES (2, 1, 2, 1, '25.00');",
  );

  let orders = SqliteSource::new(db.config()).extract_orders().await.unwrap();
  let lines: Vec<_> = orders.iter().map(|o| (o.order_id, o.product_id)).collect();
  assert_eq!(lines, [(1, 1), (1, 2)]);
}

#[tokio::test]
async fn missing_tables_fail_extraction() {
  let db = MemoryDb::new("empty", "");
  let err = SqliteSource::new(db.config()).extract_customers().await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn missing_source_file_is_not_created() {
  let path = std::env::temp_dir().join(format!("dwh-missing-{}.db", Uuid::new_v4()));
  let config = StoreConfig::new(path.to_string_lossy().into_owned());

  let err = SqliteSource::new(config).extract_products().await.unwrap_err();
  assert!(matches!(err, Error::MissingDatabase(_)));
  assert!(!path.exists());
}

#[tokio::test]
async fn extract_batch_reads_all_four_entities() {
  let db = source_db();
  db.exec(ONE_ORDER);

  let batch = extract_batch(&SqliteSource::new(db.config())).await.unwrap();
  assert!(batch.counts().iter().all(|(_, n)| *n == 1));
}

// ─── Warehouse ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn init_schema_is_repeatable() {
  let db = MemoryDb::new("dwh-init", "");
  let warehouse = SqliteWarehouse::new(db.config());

  warehouse.init_schema().await.unwrap();
  warehouse.init_schema().await.unwrap();

  for kind in EntityKind::LOAD_ORDER {
    assert_eq!(warehouse.row_count(kind).await.unwrap(), 0);
  }
}

#[tokio::test]
async fn single_customer_loads_once() {
  let src = source_db();
  src.exec(ALICE_ONLY);
  let dwh = warehouse_db();
  let warehouse = SqliteWarehouse::new(dwh.config());

  let customers = SqliteSource::new(src.config()).extract_customers().await.unwrap();

  let first = load_entity(&warehouse, &customers).await.unwrap();
  assert_eq!(first.inserted, 1);

  let (name, email, start, end, current): (String, String, String, Option<String>, bool) = dwh
    .keep
    .query_row(
      "SELECT Name, Email, StartDate, EndDate, IsCurrent FROM Dim_Customer
       WHERE Customer_ID = 1",
      [],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
    )
    .unwrap();
  assert_eq!((name.as_str(), email.as_str()), ("alice", "a@x.com"));
  assert!(DateTime::parse_from_rfc3339(&start).is_ok());
  assert!(end.is_none());
  assert!(current);

  let second = load_entity(&warehouse, &customers).await.unwrap();
  assert_eq!((second.inserted, second.skipped), (0, 1));
  assert_eq!(warehouse.row_count(EntityKind::Customer).await.unwrap(), 1);
}

#[tokio::test]
async fn exists_sees_inserted_keys_only() {
  let dwh = warehouse_db();
  let warehouse = SqliteWarehouse::new(dwh.config());
  let conn = warehouse.connect().await.unwrap();

  let src = source_db();
  src.exec(ONE_ORDER);
  let sales = SqliteSource::new(src.config()).extract_sales().await.unwrap();

  assert!(!conn.exists(EntityKind::Sale, 1).await.unwrap());
  conn.insert(WarehouseRow::Sale(sales[0].clone())).await.unwrap();
  assert!(conn.exists(EntityKind::Sale, 1).await.unwrap());
  assert!(!conn.exists(EntityKind::Order, 1).await.unwrap());
}

#[tokio::test]
async fn duplicate_insert_is_a_database_error() {
  let dwh = warehouse_db();
  let conn = SqliteWarehouse::new(dwh.config()).connect().await.unwrap();

  let src = source_db();
  src.exec(ONE_ORDER);
  let orders = SqliteSource::new(src.config()).extract_orders().await.unwrap();

  conn.insert(WarehouseRow::Order(orders[0].clone())).await.unwrap();
  let err = conn.insert(WarehouseRow::Order(orders[0].clone())).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn facts_store_exact_totals_and_timestamps() {
  let src = source_db();
  src.exec(ONE_ORDER);
  let dwh = warehouse_db();

  let pipeline =
    Pipeline::new(SqliteSource::new(src.config()), SqliteWarehouse::new(dwh.config()));
  pipeline.run().await.unwrap();

  let (created_at, quantity, total): (String, i64, String) = dwh
    .keep
    .query_row(
      "SELECT CreatedAt, Quantity_Sold, Total_Sales FROM Fact_Sales WHERE Sales_ID = 1",
      [],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )
    .unwrap();
  assert_eq!(DateTime::parse_from_rfc3339(&created_at).unwrap(), order_date());
  assert_eq!(quantity, 3);
  assert_eq!(total.parse::<Decimal>().unwrap(), Decimal::from(30));

  let price: String = dwh
    .keep
    .query_row("SELECT Price FROM Dim_Product WHERE Product_ID = 1", [], |r| r.get(0))
    .unwrap();
  assert_eq!(price.parse::<Decimal>().unwrap(), Decimal::from(10));
}

#[tokio::test]
async fn multi_line_order_keeps_first_line() {
  let src = source_db();
  src.exec(ONE_ORDER);
  src.exec(
    "INSERT INTO products (id, name, price, availability_status, subcategory_id)
       VALUES (2, 'Teapot', '25.00', 1, 1);
     INSERT INTO order_items (id, order_id, product_id, quantity, price)
       VALUES (2, 1, 2, 1, '25.00');",
  );
  let dwh = warehouse_db();

  let pipeline =
    Pipeline::new(SqliteSource::new(src.config()), SqliteWarehouse::new(dwh.config()));
  let report = pipeline.run().await.unwrap();

  let orders = &report.loads[3];
  assert_eq!(orders.kind, EntityKind::Order);
  assert_eq!((orders.extracted, orders.inserted, orders.skipped), (2, 1, 1));

  let product_id: i64 = dwh
    .keep
    .query_row("SELECT Product_ID FROM Fact_Orders WHERE Order_ID = 1", [], |r| r.get(0))
    .unwrap();
  assert_eq!(product_id, 1);

  let sales = SqliteWarehouse::new(dwh.config()).row_count(EntityKind::Sale).await.unwrap();
  assert_eq!(sales, 2);
}

#[tokio::test]
async fn rerunning_the_pipeline_writes_nothing() {
  let src = source_db();
  src.exec(ONE_ORDER);
  let dwh = warehouse_db();
  let pipeline =
    Pipeline::new(SqliteSource::new(src.config()), SqliteWarehouse::new(dwh.config()));

  let first = pipeline.run().await.unwrap();
  assert_eq!(first.inserted(), 4);

  let second = pipeline.run().await.unwrap();
  assert_eq!(second.inserted(), 0);
  assert_eq!(second.skipped(), 4);

  for kind in EntityKind::LOAD_ORDER {
    let rows = pipeline.warehouse().row_count(kind).await.unwrap();
    assert_eq!(rows, 1, "{kind} table");
  }
}

#[tokio::test]
async fn unreachable_warehouse_fails_to_connect() {
  let dir = std::env::temp_dir().join(format!("dwh-no-such-dir-{}", Uuid::new_v4()));
  let config = StoreConfig::new(dir.join("dwh.db").to_string_lossy().into_owned());

  let err = SqliteWarehouse::new(config).connect().await.err().unwrap();
  assert!(matches!(err, Error::Connect { .. }));
}
