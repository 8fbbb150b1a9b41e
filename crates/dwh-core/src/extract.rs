//! Extraction of the four row sets from a [`SourceStore`].

use serde::Serialize;

use crate::{
  entity::{Customer, EntityKind, Order, Product, Sale},
  store::SourceStore,
  Error, Result,
};

/// The four row sets extracted by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batch {
  pub customers: Vec<Customer>,
  pub products:  Vec<Product>,
  pub sales:     Vec<Sale>,
  pub orders:    Vec<Order>,
}

impl Batch {
  /// Row count per entity, in load order.
  pub fn counts(&self) -> [(EntityKind, usize); 4] {
    [
      (EntityKind::Customer, self.customers.len()),
      (EntityKind::Product, self.products.len()),
      (EntityKind::Sale, self.sales.len()),
      (EntityKind::Order, self.orders.len()),
    ]
  }

  pub fn is_empty(&self) -> bool {
    self.counts().iter().all(|(_, n)| *n == 0)
  }
}

/// Extract all four entity types, one after the other. The first failure
/// aborts the extraction.
pub async fn extract_batch<S: SourceStore>(source: &S) -> Result<Batch> {
  let customers = source
    .extract_customers()
    .await
    .map_err(|e| Error::extraction(EntityKind::Customer, e))?;
  tracing::info!(entity = %EntityKind::Customer, rows = customers.len(), "extracted");

  let products = source
    .extract_products()
    .await
    .map_err(|e| Error::extraction(EntityKind::Product, e))?;
  tracing::info!(entity = %EntityKind::Product, rows = products.len(), "extracted");

  let sales = source
    .extract_sales()
    .await
    .map_err(|e| Error::extraction(EntityKind::Sale, e))?;
  tracing::info!(entity = %EntityKind::Sale, rows = sales.len(), "extracted");

  let orders = source
    .extract_orders()
    .await
    .map_err(|e| Error::extraction(EntityKind::Order, e))?;
  tracing::info!(entity = %EntityKind::Order, rows = orders.len(), "extracted");

  Ok(Batch { customers, products, sales, orders })
}
