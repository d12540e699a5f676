use async_trait::async_trait;
use smartshop_core::types::Timestamp;
use smartshop_db::models::price_history::PriceHistoryEntry;
use smartshop_db::models::product::Product;
use smartshop_db::repositories::{PriceHistoryRepo, ProductRepo};
use smartshop_db::MongoDb;

use super::ProductStore;
use crate::error::StoreError;

/// [`ProductStore`] backed by the `products` and `price_history` collections.
#[derive(Clone)]
pub struct MongoProductStore {
    db: MongoDb,
}

impl MongoProductStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepo::list_all(&self.db).await?)
    }

    async fn find_product(&self, external_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(ProductRepo::find_by_external_id(&self.db, external_id).await?)
    }

    async fn update_price(
        &self,
        external_id: &str,
        price: f64,
        at: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(ProductRepo::update_price(&self.db, external_id, price, at).await?)
    }

    async fn append_history(&self, entry: &PriceHistoryEntry) -> Result<(), StoreError> {
        Ok(PriceHistoryRepo::insert(&self.db, entry).await?)
    }
}
