//! Alert evaluation step of a tick.
//!
//! Reads every active alert, looks up the product it points at, and applies
//! the rule for its type. Alerts are never deactivated here and nothing is
//! delivered to users; the only write is `last_triggered`.

use std::sync::Arc;

use smartshop_core::alert::{decide, AlertAction, RearmPolicy};
use smartshop_core::types::Timestamp;
use smartshop_db::models::alert::Alert;

use crate::error::StoreError;
use crate::store::{AlertStore, ProductStore};

/// Counters for one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Active alerts loaded.
    pub evaluated: usize,
    /// Alerts stamped with the tick timestamp.
    pub triggered: usize,
    /// Alerts whose `last_triggered` was cleared.
    pub rearmed: usize,
    /// Alerts with no product reference, an unknown type, or a dangling product.
    pub skipped: usize,
    /// Alerts where a lookup or write failed.
    pub failed: usize,
}

enum AlertOutcome {
    Triggered,
    Rearmed,
    Unchanged,
    Skipped,
    Failed,
}

/// Evaluates active alerts against current product state.
pub struct AlertEvaluator {
    alerts: Arc<dyn AlertStore>,
    products: Arc<dyn ProductStore>,
    rearm: RearmPolicy,
}

impl AlertEvaluator {
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        products: Arc<dyn ProductStore>,
        rearm: RearmPolicy,
    ) -> Self {
        Self {
            alerts,
            products,
            rearm,
        }
    }

    /// Evaluate every active alert, stamping triggers with `now`.
    ///
    /// Only a failure to list alerts is returned as an error.
    pub async fn evaluate(&self, now: Timestamp) -> Result<EvaluationReport, StoreError> {
        let alerts = self.alerts.list_active().await?;
        let mut report = EvaluationReport {
            evaluated: alerts.len(),
            ..Default::default()
        };

        for alert in &alerts {
            match self.evaluate_one(alert, now).await {
                AlertOutcome::Triggered => report.triggered += 1,
                AlertOutcome::Rearmed => report.rearmed += 1,
                AlertOutcome::Unchanged => {}
                AlertOutcome::Skipped => report.skipped += 1,
                AlertOutcome::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    async fn evaluate_one(&self, alert: &Alert, now: Timestamp) -> AlertOutcome {
        let Some(external_id) = alert.product_external_id.as_deref() else {
            return AlertOutcome::Skipped;
        };

        let alert_type = match alert.kind() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(alert_id = alert.id, error = %e, "Skipping alert");
                return AlertOutcome::Skipped;
            }
        };

        let product = match self.products.find_product(external_id).await {
            Ok(Some(p)) => p,
            Ok(None) => return AlertOutcome::Skipped,
            Err(e) => {
                tracing::error!(
                    alert_id = alert.id,
                    external_id,
                    error = %e,
                    "Failed to load product for alert"
                );
                return AlertOutcome::Failed;
            }
        };

        let action = decide(
            alert_type,
            alert.threshold_price,
            &product.snapshot(),
            alert.last_triggered.is_some(),
            self.rearm,
        );

        match action {
            AlertAction::Trigger => match self.alerts.mark_triggered(alert.id, now).await {
                Ok(false) => AlertOutcome::Skipped,
                Ok(true) => {
                    tracing::info!(
                        alert_id = alert.id,
                        user_id = alert.user_id,
                        alert_type = %alert_type,
                        title = %product.title,
                        price = product.current_price,
                        "Alert triggered"
                    );
                    AlertOutcome::Triggered
                }
                Err(e) => {
                    tracing::error!(alert_id = alert.id, error = %e, "Failed to mark alert triggered");
                    AlertOutcome::Failed
                }
            },
            AlertAction::Rearm => match self.alerts.clear_triggered(alert.id).await {
                Ok(true) => {
                    tracing::debug!(alert_id = alert.id, "Alert re-armed");
                    AlertOutcome::Rearmed
                }
                Ok(false) => AlertOutcome::Unchanged,
                Err(e) => {
                    tracing::error!(alert_id = alert.id, error = %e, "Failed to re-arm alert");
                    AlertOutcome::Failed
                }
            },
            AlertAction::Unchanged => AlertOutcome::Unchanged,
        }
    }
}
