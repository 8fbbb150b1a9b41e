//! SQL schemas for the transactional source and the warehouse.
//!
//! Both are plain `CREATE TABLE IF NOT EXISTS` scripts. There are no
//! migrations; an existing table is left as it is.

/// Warehouse DDL, applied by [`SqliteWarehouse::init_schema`].
///
/// Money is stored as canonical decimal text and timestamps as RFC 3339 text
/// so nothing is rounded through floating point. Fact tables carry no foreign
/// keys: products without a category never reach `Dim_Product`, yet their
/// sales are still loaded.
///
/// [`SqliteWarehouse::init_schema`]: crate::SqliteWarehouse::init_schema
pub const WAREHOUSE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Dim_Customer (
    Customer_ID INTEGER PRIMARY KEY,
    Name        TEXT,
    Email       TEXT,
    StartDate   TEXT    NOT NULL,
    EndDate     TEXT,
    IsCurrent   INTEGER NOT NULL CHECK (IsCurrent IN (0, 1))
);

CREATE TABLE IF NOT EXISTS Dim_Product (
    Product_ID  INTEGER PRIMARY KEY,
    Name        TEXT,
    Subcategory TEXT,
    Category    TEXT,
    Price       TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS Fact_Sales (
    Sales_ID      INTEGER PRIMARY KEY,
    Product_ID    INTEGER NOT NULL,
    Customer_ID   INTEGER NOT NULL,
    CreatedAt     TEXT    NOT NULL,
    Quantity_Sold INTEGER NOT NULL,
    Total_Sales   TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS Fact_Orders (
    Order_ID       INTEGER PRIMARY KEY,
    Product_ID     INTEGER NOT NULL,
    Customer_ID    INTEGER NOT NULL,
    CreatedAt      TEXT    NOT NULL,
    Order_Quantity INTEGER NOT NULL,
    Order_Total    TEXT    NOT NULL
);
";

/// The transactional tables the extractor reads, limited to the columns it
/// uses. Handy for seeding a source database.
pub const SOURCE_SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY,
    username TEXT,
    email    TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY,
    name TEXT
);

CREATE TABLE IF NOT EXISTS subcategories (
    id          INTEGER PRIMARY KEY,
    name        TEXT,
    category_id INTEGER REFERENCES categories(id)
);

CREATE TABLE IF NOT EXISTS products (
    id                  INTEGER PRIMARY KEY,
    name                TEXT,
    price               NUMERIC NOT NULL,
    availability_status INTEGER NOT NULL DEFAULT 1,
    subcategory_id      INTEGER REFERENCES subcategories(id)
);

CREATE TABLE IF NOT EXISTS orders (
    id               INTEGER PRIMARY KEY,
    user_id          INTEGER NOT NULL REFERENCES users(id),
    order_date       TEXT    NOT NULL,
    delivery_address TEXT
);

CREATE TABLE IF NOT EXISTS order_items (
    id         INTEGER PRIMARY KEY,
    order_id   INTEGER NOT NULL REFERENCES orders(id),
    product_id INTEGER NOT NULL REFERENCES products(id),
    quantity   INTEGER NOT NULL,
    price      NUMERIC NOT NULL
);
";
