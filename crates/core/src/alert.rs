//! Price and stock alert rules.
//!
//! An alert belongs to a user and watches one product. Every tick the worker
//! asks [`decide`] what to do with each active alert given the product's
//! current state; the rule per [`AlertType`] is a plain exhaustive match.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stock::StockStatus;

// ---------------------------------------------------------------------------
// Alert type
// ---------------------------------------------------------------------------

/// Condition an alert watches for. Stored as snake_case text in `alerts.alert_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Fires when the price is at or below the threshold.
    PriceDrop,
    /// Fires when the price is at or above the threshold.
    PriceIncrease,
    /// Fires when the product is in stock.
    StockAvailable,
    /// Fires when the product is out of stock.
    StockOut,
}

impl AlertType {
    pub const ALL: [AlertType; 4] = [
        Self::PriceDrop,
        Self::PriceIncrease,
        Self::StockAvailable,
        Self::StockOut,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriceDrop => "price_drop",
            Self::PriceIncrease => "price_increase",
            Self::StockAvailable => "stock_available",
            Self::StockOut => "stock_out",
        }
    }

    /// Price-type alerts compare against a threshold and cannot exist without one.
    pub fn requires_threshold(self) -> bool {
        matches!(self, Self::PriceDrop | Self::PriceIncrease)
    }

    /// Evaluate the condition against a product snapshot.
    ///
    /// Threshold comparisons are inclusive. A price alert without a threshold
    /// never fires, and an unrecognised stock status matches neither stock rule.
    pub fn is_triggered(self, product: &ProductSnapshot, threshold: Option<f64>) -> bool {
        match self {
            Self::PriceDrop => threshold.is_some_and(|t| product.price <= t),
            Self::PriceIncrease => threshold.is_some_and(|t| product.price >= t),
            Self::StockAvailable => product.stock == Some(StockStatus::InStock),
            Self::StockOut => product.stock == Some(StockStatus::OutOfStock),
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "alert type",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Product snapshot
// ---------------------------------------------------------------------------

/// The parts of a product an alert rule looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductSnapshot {
    pub price: f64,
    /// `None` when the stored status is not one we recognise.
    pub stock: Option<StockStatus>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Observable lifecycle state of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    /// Switched off by its owner; never evaluated.
    Inactive,
    /// Active and waiting for its condition.
    Armed,
    /// Active and has fired at least once since it was last armed.
    Triggered,
}

impl AlertState {
    pub fn of(is_active: bool, has_fired: bool) -> Self {
        match (is_active, has_fired) {
            (false, _) => Self::Inactive,
            (true, false) => Self::Armed,
            (true, true) => Self::Triggered,
        }
    }
}

/// What happens to a triggered alert whose condition stops holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RearmPolicy {
    /// Stay triggered until the owner resets it.
    #[default]
    Never,
    /// Clear `last_triggered` once the condition no longer holds.
    WhenCleared,
}

impl FromStr for RearmPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(Self::Never),
            "when_cleared" => Ok(Self::WhenCleared),
            other => Err(CoreError::UnknownVariant {
                kind: "rearm policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of evaluating one active alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Condition holds: stamp `last_triggered`.
    Trigger,
    /// Condition no longer holds and the policy allows re-arming.
    Rearm,
    /// Nothing to write.
    Unchanged,
}

/// Decide the action for an active alert.
///
/// A matching alert is re-stamped on every evaluation, so `last_triggered`
/// always reflects the most recent tick at which the condition held.
pub fn decide(
    alert_type: AlertType,
    threshold: Option<f64>,
    product: &ProductSnapshot,
    has_fired: bool,
    policy: RearmPolicy,
) -> AlertAction {
    if alert_type.is_triggered(product, threshold) {
        return AlertAction::Trigger;
    }
    match policy {
        RearmPolicy::WhenCleared if has_fired => AlertAction::Rearm,
        _ => AlertAction::Unchanged,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a new alert before it is written.
///
/// Price-type alerts must carry a threshold. Any threshold that is present
/// must be a positive, finite amount.
pub fn validate_new_alert(alert_type: AlertType, threshold: Option<f64>) -> Result<(), CoreError> {
    match threshold {
        None if alert_type.requires_threshold() => Err(CoreError::Validation(format!(
            "{alert_type} alerts require a threshold price"
        ))),
        Some(t) if !t.is_finite() || t <= 0.0 => Err(CoreError::Validation(format!(
            "threshold price must be a positive amount, got {t}"
        ))),
        _ => Ok(()),
    }
}
