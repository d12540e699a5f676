//! Store seams between the tick logic and the databases.
//!
//! The simulator and evaluator only see these traits. Production wires in
//! [`MongoProductStore`] and [`PgAlertStore`]; tests substitute in-memory
//! implementations.

mod mongo;
mod postgres;

use async_trait::async_trait;
use smartshop_core::types::{DbId, Timestamp};
use smartshop_db::models::alert::Alert;
use smartshop_db::models::price_history::PriceHistoryEntry;
use smartshop_db::models::product::Product;

use crate::error::StoreError;

pub use mongo::MongoProductStore;
pub use postgres::PgAlertStore;

/// Product state and price history (document store).
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, external_id: &str) -> Result<Option<Product>, StoreError>;

    /// Set the current price. Returns `false` if no product matched.
    async fn update_price(
        &self,
        external_id: &str,
        price: f64,
        at: Timestamp,
    ) -> Result<bool, StoreError>;

    async fn append_history(&self, entry: &PriceHistoryEntry) -> Result<(), StoreError>;
}

/// User alerts (relational store).
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Alert>, StoreError>;

    /// Stamp `last_triggered`. Returns `false` if the alert no longer exists.
    async fn mark_triggered(&self, id: DbId, at: Timestamp) -> Result<bool, StoreError>;

    /// Clear `last_triggered`. Returns `false` if nothing was re-armed.
    async fn clear_triggered(&self, id: DbId) -> Result<bool, StoreError>;
}
