//! Product stock status as stored in the `products` collection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub const IN_STOCK: &str = "in_stock";
pub const OUT_OF_STOCK: &str = "out_of_stock";

/// Availability of a product at its marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => IN_STOCK,
            Self::OutOfStock => OUT_OF_STOCK,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the stored value.
impl FromStr for StockStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            IN_STOCK => Ok(Self::InStock),
            OUT_OF_STOCK => Ok(Self::OutOfStock),
            other => Err(CoreError::UnknownVariant {
                kind: "stock status",
                value: other.to_string(),
            }),
        }
    }
}
