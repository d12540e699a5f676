//! Integration tests for the alerts repository.
//!
//! Each test gets a fresh database from `DATABASE_URL` with the shared
//! migrations applied.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use smartshop_core::alert::{AlertState, AlertType};
use smartshop_db::models::alert::CreateAlert;
use smartshop_db::repositories::AlertRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn price_drop(user_id: i64, product: &str, threshold: f64) -> CreateAlert {
    CreateAlert {
        user_id,
        product_external_id: Some(product.to_string()),
        alert_type: AlertType::PriceDrop,
        threshold_price: Some(threshold),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_round_trips_threshold_and_type(pool: PgPool) {
    let alert = AlertRepo::create(&pool, &price_drop(1, "B08N5WRWNW", 50.0))
        .await
        .unwrap();

    assert_eq!(alert.kind().unwrap(), AlertType::PriceDrop);
    assert_eq!(alert.threshold_price, Some(50.0));
    assert!(alert.is_active);
    assert_eq!(alert.state(), AlertState::Armed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_active_excludes_toggled_off(pool: PgPool) {
    let a = AlertRepo::create(&pool, &price_drop(1, "A", 10.0)).await.unwrap();
    let b = AlertRepo::create(&pool, &price_drop(1, "B", 10.0)).await.unwrap();

    assert!(AlertRepo::set_active(&pool, a.id, false).await.unwrap());

    let active = AlertRepo::list_active(&pool).await.unwrap();
    let ids: Vec<i64> = active.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![b.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_and_rearm(pool: PgPool) {
    let alert = AlertRepo::create(&pool, &price_drop(2, "C", 20.0)).await.unwrap();
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();

    assert!(AlertRepo::mark_triggered(&pool, alert.id, at).await.unwrap());
    let fired = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    assert_eq!(fired.last_triggered, Some(at));
    assert_eq!(fired.state(), AlertState::Triggered);

    assert!(AlertRepo::clear_triggered(&pool, alert.id).await.unwrap());
    assert!(!AlertRepo::clear_triggered(&pool, alert.id).await.unwrap());
    let rearmed = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    assert_matches!(rearmed.last_triggered, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_type_is_rejected_by_schema(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO alerts (user_id, alert_type) VALUES (1, 'price_spike')",
    )
    .execute(&pool)
    .await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn updates_on_missing_alert_report_false(pool: PgPool) {
    assert!(!AlertRepo::set_active(&pool, 9_999, true).await.unwrap());
    assert!(!AlertRepo::mark_triggered(&pool, 9_999, Utc::now()).await.unwrap());
    assert!(!AlertRepo::clear_triggered(&pool, 9_999).await.unwrap());
    assert!(AlertRepo::find_by_id(&pool, 9_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn validated_alerts_are_stored_as_given(pool: PgPool) {
    let stock = CreateAlert {
        user_id: 7,
        product_external_id: Some("D".to_string()),
        alert_type: AlertType::StockAvailable,
        threshold_price: None,
    };
    let unpriced = CreateAlert {
        alert_type: AlertType::PriceIncrease,
        ..stock.clone()
    };
    assert!(stock.validate().is_ok());
    assert!(unpriced.validate().is_err());

    let created = AlertRepo::create(&pool, &stock).await.unwrap();

    assert_eq!(created.user_id, 7);
    assert_eq!(created.kind().unwrap(), AlertType::StockAvailable);
    assert_eq!(created.threshold_price, None);
    assert_eq!(created.product_external_id.as_deref(), Some("D"));
}
