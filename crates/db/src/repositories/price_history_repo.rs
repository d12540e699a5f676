//! Repository for the `price_history` collection (append-only).

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;

use crate::models::price_history::PriceHistoryEntry;
use crate::mongo::{MongoDb, PRICE_HISTORY_COLLECTION};

/// Provides query operations for price history.
pub struct PriceHistoryRepo;

impl PriceHistoryRepo {
    fn collection(db: &MongoDb) -> Collection<PriceHistoryEntry> {
        db.collection(PRICE_HISTORY_COLLECTION)
    }

    /// Append one entry.
    pub async fn insert(db: &MongoDb, entry: &PriceHistoryEntry) -> Result<(), mongodb::error::Error> {
        Self::collection(db).insert_one(entry).await?;
        Ok(())
    }

    /// Most recent entries for a product, newest first.
    pub async fn list_for_product(
        db: &MongoDb,
        product_id: &str,
        limit: i64,
    ) -> Result<Vec<PriceHistoryEntry>, mongodb::error::Error> {
        Self::collection(db)
            .find(doc! { "product_id": product_id })
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await
    }

    /// Number of entries recorded for a product.
    pub async fn count_for_product(
        db: &MongoDb,
        product_id: &str,
    ) -> Result<u64, mongodb::error::Error> {
        Self::collection(db)
            .count_documents(doc! { "product_id": product_id })
            .await
    }
}
