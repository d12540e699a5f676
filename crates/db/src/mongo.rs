//! MongoDB connection helpers and BSON time conversion.

use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::{Client, Database};
use smartshop_core::types::Timestamp;

/// Handle to the document database. Cheap to clone.
pub type MongoDb = Database;

/// Name of the collection holding current product state.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Name of the append-only price history collection.
pub const PRICE_HISTORY_COLLECTION: &str = "price_history";

/// Build a client for `uri` and select `database`.
///
/// The driver connects lazily, so this only fails for a malformed URI or
/// unresolvable SRV record.
pub async fn connect_mongo(uri: &str, database: &str) -> Result<(Client, MongoDb), mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(database);
    Ok((client, db))
}

/// Send a `ping` command to prove the server is reachable.
pub async fn mongo_health_check(db: &MongoDb) -> Result<(), mongodb::error::Error> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Convert a UTC timestamp to BSON (millisecond precision).
pub fn to_bson(ts: Timestamp) -> BsonDateTime {
    BsonDateTime::from_millis(ts.timestamp_millis())
}

/// Convert a BSON datetime back to a UTC timestamp.
///
/// Returns `None` for values outside chrono's representable range.
pub fn from_bson(dt: BsonDateTime) -> Option<Timestamp> {
    chrono::DateTime::from_timestamp_millis(dt.timestamp_millis())
}
