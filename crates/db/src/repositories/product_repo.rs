//! Repository for the `products` collection.

use futures::TryStreamExt;
use mongodb::bson::{doc, from_document, Document};
use mongodb::Collection;
use smartshop_core::types::Timestamp;

use crate::models::product::Product;
use crate::mongo::{to_bson, MongoDb, PRODUCTS_COLLECTION};

/// Provides query operations for product documents.
pub struct ProductRepo;

impl ProductRepo {
    fn collection(db: &MongoDb) -> Collection<Product> {
        db.collection(PRODUCTS_COLLECTION)
    }

    /// Load every product.
    ///
    /// Documents are decoded one at a time; a document that does not decode
    /// as a [`Product`] is logged and left out rather than failing the list.
    pub async fn list_all(db: &MongoDb) -> Result<Vec<Product>, mongodb::error::Error> {
        let raw: Vec<Document> = db
            .collection::<Document>(PRODUCTS_COLLECTION)
            .find(doc! {})
            .await?
            .try_collect()
            .await?;
        Ok(decode_each(raw))
    }

    /// Find a product by its marketplace identifier.
    pub async fn find_by_external_id(
        db: &MongoDb,
        external_id: &str,
    ) -> Result<Option<Product>, mongodb::error::Error> {
        Self::collection(db)
            .find_one(doc! { "external_id": external_id })
            .await
    }

    /// Insert a new product document.
    pub async fn insert(db: &MongoDb, product: &Product) -> Result<(), mongodb::error::Error> {
        Self::collection(db).insert_one(product).await?;
        Ok(())
    }

    /// Set the current price and `last_updated`.
    ///
    /// Returns `true` if a product matched `external_id`.
    pub async fn update_price(
        db: &MongoDb,
        external_id: &str,
        price: f64,
        at: Timestamp,
    ) -> Result<bool, mongodb::error::Error> {
        let result = Self::collection(db)
            .update_one(
                doc! { "external_id": external_id },
                doc! { "$set": { "current_price": price, "last_updated": to_bson(at) } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

fn decode_each(raw: Vec<Document>) -> Vec<Product> {
    raw.into_iter()
        .filter_map(|document| {
            let external_id = document
                .get_str("external_id")
                .unwrap_or("<missing>")
                .to_string();
            match from_document::<Product>(document) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(
                        external_id = %external_id,
                        error = %e,
                        "Skipping malformed product document"
                    );
                    None
                }
            }
        })
        .collect()
}
