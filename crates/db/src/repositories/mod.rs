//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept the store handle (`&PgPool` or `&MongoDb`) as the first argument.

pub mod alert_repo;
pub mod price_history_repo;
pub mod product_repo;

pub use alert_repo::AlertRepo;
pub use price_history_repo::PriceHistoryRepo;
pub use product_repo::ProductRepo;
