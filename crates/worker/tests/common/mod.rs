//! In-memory store implementations shared by the worker integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smartshop_core::alert::{AlertType, RearmPolicy};
use smartshop_core::error::CoreError;
use smartshop_core::pricing::PriceRules;
use smartshop_core::types::{DbId, Timestamp};
use smartshop_db::models::alert::Alert;
use smartshop_db::models::price_history::PriceHistoryEntry;
use smartshop_db::models::product::Product;
use smartshop_worker::error::StoreError;
use smartshop_worker::store::{AlertStore, ProductStore};
use smartshop_worker::{AlertEvaluator, OverlapPolicy, PriceSimulator, TickRunner};
use tokio::sync::{Notify, Semaphore};

fn injected(what: &str) -> StoreError {
    StoreError::Core(CoreError::Internal(format!("injected failure: {what}")))
}

/// A fixed tick timestamp.
pub fn tick_time() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryProducts {
    products: Mutex<Vec<Product>>,
    history: Mutex<Vec<PriceHistoryEntry>>,
    failing_updates: Mutex<HashSet<String>>,
    failing_history: Mutex<HashSet<String>>,
    fail_list: AtomicBool,
}

impl MemoryProducts {
    pub fn with(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            products: Mutex::new(products),
            ..Default::default()
        })
    }

    pub fn get(&self, external_id: &str) -> Option<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.external_id == external_id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    pub fn set_price(&self, external_id: &str, price: f64) {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.external_id == external_id) {
            p.current_price = price;
        }
    }

    pub fn set_stock(&self, external_id: &str, status: &str) {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.external_id == external_id) {
            p.stock_status = status.to_string();
        }
    }

    pub fn history_for(&self, external_id: &str) -> Vec<PriceHistoryEntry> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.product_id == external_id)
            .cloned()
            .collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    pub fn fail_updates_for(&self, external_id: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .insert(external_id.to_string());
    }

    pub fn fail_history_for(&self, external_id: &str) {
        self.failing_history
            .lock()
            .unwrap()
            .insert(external_id.to_string());
    }

    pub fn fail_listing(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    /// Remove a product without touching its history.
    pub fn remove(&self, external_id: &str) {
        self.products
            .lock()
            .unwrap()
            .retain(|p| p.external_id != external_id);
    }
}

#[async_trait]
impl ProductStore for MemoryProducts {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("list products"));
        }
        Ok(self.all())
    }

    async fn find_product(&self, external_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.get(external_id))
    }

    async fn update_price(
        &self,
        external_id: &str,
        price: f64,
        at: Timestamp,
    ) -> Result<bool, StoreError> {
        if self.failing_updates.lock().unwrap().contains(external_id) {
            return Err(injected("update price"));
        }
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.external_id == external_id) {
            Some(p) => {
                p.current_price = price;
                p.last_updated = Some(smartshop_db::mongo::to_bson(at));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_history(&self, entry: &PriceHistoryEntry) -> Result<(), StoreError> {
        if self.failing_history.lock().unwrap().contains(&entry.product_id) {
            return Err(injected("append history"));
        }
        self.history.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Wraps a [`ProductStore`] so `list_products` reads the catalogue, then
/// blocks until permits are added.
pub struct GatedProducts {
    pub inner: Arc<MemoryProducts>,
    pub entered: Notify,
    pub gate: Semaphore,
}

impl GatedProducts {
    pub fn new(inner: Arc<MemoryProducts>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            entered: Notify::new(),
            gate: Semaphore::new(0),
        })
    }

    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl ProductStore for GatedProducts {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let listed = self.inner.list_products().await;
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.expect("gate closed");
        listed
    }

    async fn find_product(&self, external_id: &str) -> Result<Option<Product>, StoreError> {
        self.inner.find_product(external_id).await
    }

    async fn update_price(
        &self,
        external_id: &str,
        price: f64,
        at: Timestamp,
    ) -> Result<bool, StoreError> {
        self.inner.update_price(external_id, price, at).await
    }

    async fn append_history(&self, entry: &PriceHistoryEntry) -> Result<(), StoreError> {
        self.inner.append_history(entry).await
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryAlerts {
    alerts: Mutex<Vec<Alert>>,
    /// Returned by `list_active` but gone from the table.
    deleted: Mutex<Vec<Alert>>,
    failing_marks: Mutex<HashSet<DbId>>,
    fail_list: AtomicBool,
}

impl MemoryAlerts {
    pub fn with(alerts: Vec<Alert>) -> Arc<Self> {
        Arc::new(Self {
            alerts: Mutex::new(alerts),
            ..Default::default()
        })
    }

    pub fn get(&self, id: DbId) -> Alert {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .expect("alert exists")
    }

    /// The owner's on/off toggle.
    pub fn set_active(&self, id: DbId, active: bool) {
        let mut alerts = self.alerts.lock().unwrap();
        if let Some(a) = alerts.iter_mut().find(|a| a.id == id) {
            a.is_active = active;
        }
    }

    /// Simulate a row deleted after `list_active` read it.
    pub fn delete_after_listing(&self, id: DbId) {
        let mut alerts = self.alerts.lock().unwrap();
        if let Some(pos) = alerts.iter().position(|a| a.id == id) {
            let alert = alerts.remove(pos);
            self.deleted.lock().unwrap().push(alert);
        }
    }

    pub fn fail_marks_for(&self, id: DbId) {
        self.failing_marks.lock().unwrap().insert(id);
    }

    pub fn fail_listing(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlertStore for MemoryAlerts {
    async fn list_active(&self) -> Result<Vec<Alert>, StoreError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("list alerts"));
        }
        let mut listed: Vec<Alert> = self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        listed.extend(self.deleted.lock().unwrap().iter().cloned());
        Ok(listed)
    }

    async fn mark_triggered(&self, id: DbId, at: Timestamp) -> Result<bool, StoreError> {
        if self.failing_marks.lock().unwrap().contains(&id) {
            return Err(injected("mark triggered"));
        }
        let mut alerts = self.alerts.lock().unwrap();
        match alerts.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.last_triggered = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_triggered(&self, id: DbId) -> Result<bool, StoreError> {
        let mut alerts = self.alerts.lock().unwrap();
        match alerts
            .iter_mut()
            .find(|a| a.id == id && a.last_triggered.is_some())
        {
            Some(a) => {
                a.last_triggered = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn product(external_id: &str, price: f64) -> Product {
    Product::new(external_id, "amazon", format!("Product {external_id}"), price)
}

pub fn alert(id: DbId, product: Option<&str>, alert_type: &str, threshold: Option<f64>) -> Alert {
    Alert {
        id,
        user_id: 1,
        product_external_id: product.map(str::to_string),
        alert_type: alert_type.to_string(),
        threshold_price: threshold,
        is_active: true,
        last_triggered: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn typed_alert(
    id: DbId,
    product: &str,
    alert_type: AlertType,
    threshold: Option<f64>,
) -> Alert {
    alert(id, Some(product), alert_type.as_str(), threshold)
}

pub fn simulator(products: Arc<dyn ProductStore>, seed: u64) -> PriceSimulator {
    PriceSimulator::with_rng(products, PriceRules::default(), StdRng::seed_from_u64(seed))
}

pub fn evaluator(
    alerts: Arc<dyn AlertStore>,
    products: Arc<dyn ProductStore>,
    rearm: RearmPolicy,
) -> AlertEvaluator {
    AlertEvaluator::new(alerts, products, rearm)
}

pub fn runner(
    products: Arc<dyn ProductStore>,
    alerts: Arc<dyn AlertStore>,
    overlap: OverlapPolicy,
) -> TickRunner {
    TickRunner::new(
        simulator(Arc::clone(&products), 1),
        evaluator(alerts, products, RearmPolicy::Never),
        overlap,
    )
}
