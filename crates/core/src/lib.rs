//! Domain rules shared by the SmartShop price worker.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the worker, and any future CLI tooling alike.

pub mod alert;
pub mod error;
pub mod pricing;
pub mod stock;
pub mod types;
