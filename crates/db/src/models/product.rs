//! Product documents (`products` collection).

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use smartshop_core::alert::ProductSnapshot;
use smartshop_core::pricing::DEFAULT_CURRENCY;
use smartshop_core::stock::{StockStatus, IN_STOCK};
use smartshop_core::types::Timestamp;

use crate::mongo::from_bson;

/// A tracked product, keyed by `(external_id, marketplace)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub external_id: String,
    #[serde(default = "default_marketplace")]
    pub marketplace: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub current_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Raw stored status. Values other than `in_stock`/`out_of_stock` are kept.
    #[serde(default = "default_stock_status")]
    pub stock_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<BsonDateTime>,
}

pub(crate) fn default_marketplace() -> String {
    "amazon".to_string()
}

pub(crate) fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_stock_status() -> String {
    IN_STOCK.to_string()
}

impl Product {
    /// A fresh in-stock product in the default currency.
    pub fn new(
        external_id: impl Into<String>,
        marketplace: impl Into<String>,
        title: impl Into<String>,
        current_price: f64,
    ) -> Self {
        Self {
            id: None,
            external_id: external_id.into(),
            marketplace: marketplace.into(),
            title: title.into(),
            brand: None,
            category: None,
            current_price,
            currency: default_currency(),
            stock_status: default_stock_status(),
            last_updated: None,
        }
    }

    pub fn with_stock_status(mut self, status: impl Into<String>) -> Self {
        self.stock_status = status.into();
        self
    }

    /// Parsed stock status, `None` if the stored value is unrecognised.
    pub fn stock(&self) -> Option<StockStatus> {
        self.stock_status.parse().ok()
    }

    pub fn last_updated_at(&self) -> Option<Timestamp> {
        self.last_updated.and_then(from_bson)
    }

    /// The fields alert rules look at.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            price: self.current_price,
            stock: self.stock(),
        }
    }
}
