use async_trait::async_trait;
use smartshop_core::types::{DbId, Timestamp};
use smartshop_db::models::alert::Alert;
use smartshop_db::repositories::AlertRepo;
use smartshop_db::DbPool;

use super::AlertStore;
use crate::error::StoreError;

/// [`AlertStore`] backed by the `alerts` table.
#[derive(Clone)]
pub struct PgAlertStore {
    pool: DbPool,
}

impl PgAlertStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(AlertRepo::list_active(&self.pool).await?)
    }

    async fn mark_triggered(&self, id: DbId, at: Timestamp) -> Result<bool, StoreError> {
        Ok(AlertRepo::mark_triggered(&self.pool, id, at).await?)
    }

    async fn clear_triggered(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AlertRepo::clear_triggered(&self.pool, id).await?)
    }
}
