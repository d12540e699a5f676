//! User alerts on product price and stock (`alerts` table).

use serde::{Deserialize, Serialize};
use smartshop_core::alert::{validate_new_alert, AlertState, AlertType};
use smartshop_core::error::CoreError;
use smartshop_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `alerts` table.
///
/// `alert_type` is kept as the raw stored text; use [`Alert::kind`] to get
/// the typed rule.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub user_id: DbId,
    /// Soft reference to `products.external_id` in the document store.
    pub product_external_id: Option<String>,
    pub alert_type: String,
    pub threshold_price: Option<f64>,
    pub is_active: bool,
    pub last_triggered: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Alert {
    pub fn kind(&self) -> Result<AlertType, CoreError> {
        self.alert_type.parse()
    }

    pub fn state(&self) -> AlertState {
        AlertState::of(self.is_active, self.last_triggered.is_some())
    }
}

/// DTO for inserting a new alert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlert {
    pub user_id: DbId,
    pub product_external_id: Option<String>,
    pub alert_type: AlertType,
    pub threshold_price: Option<f64>,
}

impl CreateAlert {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_new_alert(self.alert_type, self.threshold_price)
    }
}
