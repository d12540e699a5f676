//! Domain model structs and DTOs.
//!
//! Relational entities derive `FromRow`; documents derive serde and are
//! read and written as-is by the MongoDB driver.

pub mod alert;
pub mod price_history;
pub mod product;
