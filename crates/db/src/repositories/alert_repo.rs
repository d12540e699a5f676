//! Repository for the `alerts` table.

use smartshop_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

/// Column list for `alerts` SELECT queries.
///
/// `threshold_price` is NUMERIC in the schema and cast so it decodes as `f64`.
const COLUMNS: &str = "\
    id, user_id, product_external_id, alert_type, \
    threshold_price::DOUBLE PRECISION AS threshold_price, \
    is_active, last_triggered, created_at";

/// Provides query operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert. Callers validate the DTO first.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (user_id, product_external_id, alert_type, threshold_price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.user_id)
            .bind(&input.product_external_id)
            .bind(input.alert_type.as_str())
            .bind(input.threshold_price)
            .fetch_one(pool)
            .await
    }

    /// Find an alert by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every alert with `is_active = true`, oldest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE is_active = true \
             ORDER BY id"
        );
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    /// Stamp `last_triggered`.
    ///
    /// Returns `true` if the alert exists and was updated.
    pub async fn mark_triggered(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE alerts SET last_triggered = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reset `last_triggered` to NULL, re-arming the alert.
    ///
    /// Returns `true` if a triggered alert was re-armed.
    pub async fn clear_triggered(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts SET last_triggered = NULL \
             WHERE id = $1 AND last_triggered IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Switch an alert on or off.
    ///
    /// Returns `true` if the alert exists.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE alerts SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
