//! Price history documents (`price_history` collection, append-only).

use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use smartshop_core::types::Timestamp;

use crate::models::product::{default_currency, default_marketplace, Product};
use crate::mongo::{from_bson, to_bson};

/// One recorded price for a product. Never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceHistoryEntry {
    /// The product's `external_id`.
    pub product_id: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
    pub timestamp: BsonDateTime,
}

impl PriceHistoryEntry {
    /// Record `price` for `product` at `at`.
    pub fn for_product(product: &Product, price: f64, at: Timestamp) -> Self {
        Self {
            product_id: product.external_id.clone(),
            price,
            currency: product.currency.clone(),
            marketplace: product.marketplace.clone(),
            timestamp: to_bson(at),
        }
    }

    pub fn recorded_at(&self) -> Option<Timestamp> {
        from_bson(self.timestamp)
    }
}
