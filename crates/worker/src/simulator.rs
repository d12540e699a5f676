//! Price simulation step of a tick.
//!
//! Every product gets a new price drawn by [`PriceRules::perturb`]. The new
//! price and a history entry are written as two independent operations with
//! no transaction around them: a failure on one product is logged and the
//! loop moves on to the next.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use smartshop_core::pricing::PriceRules;
use smartshop_core::types::Timestamp;
use smartshop_db::models::price_history::PriceHistoryEntry;
use smartshop_db::models::product::Product;

use crate::error::StoreError;
use crate::store::ProductStore;

/// Counters for one simulation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Products loaded at the start of the pass.
    pub products: usize,
    /// Products whose price and history were both written.
    pub updated: usize,
    /// Products that disappeared between listing and update.
    pub missing: usize,
    /// Products where a write failed.
    pub failed: usize,
}

/// Result of processing a single product.
enum ProductOutcome {
    Updated,
    Missing,
    Failed,
}

/// Moves product prices once per tick.
pub struct PriceSimulator {
    products: Arc<dyn ProductStore>,
    rules: PriceRules,
    rng: StdRng,
}

impl PriceSimulator {
    /// Create a simulator seeded from the operating system.
    pub fn new(products: Arc<dyn ProductStore>, rules: PriceRules) -> Self {
        Self::with_rng(products, rules, StdRng::from_os_rng())
    }

    /// Create a simulator with an explicit random source.
    pub fn with_rng(products: Arc<dyn ProductStore>, rules: PriceRules, rng: StdRng) -> Self {
        Self {
            products,
            rules,
            rng,
        }
    }

    /// Run one simulation pass, stamping every write with `now`.
    ///
    /// Only a failure to list products is returned as an error; per-product
    /// failures are logged and counted.
    pub async fn tick(&mut self, now: Timestamp) -> Result<SimulationReport, StoreError> {
        let products = self.products.list_products().await?;
        let mut report = SimulationReport {
            products: products.len(),
            ..Default::default()
        };

        for product in &products {
            let new_price = self.rules.perturb(product.current_price, &mut self.rng);
            match self.apply(product, new_price, now).await {
                ProductOutcome::Updated => report.updated += 1,
                ProductOutcome::Missing => report.missing += 1,
                ProductOutcome::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    async fn apply(&self, product: &Product, new_price: f64, now: Timestamp) -> ProductOutcome {
        match self
            .products
            .update_price(&product.external_id, new_price, now)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(
                    external_id = %product.external_id,
                    "Product removed before its price could be updated"
                );
                return ProductOutcome::Missing;
            }
            Err(e) => {
                tracing::error!(
                    external_id = %product.external_id,
                    error = %e,
                    "Failed to update product price"
                );
                return ProductOutcome::Failed;
            }
        }

        let entry = PriceHistoryEntry::for_product(product, new_price, now);
        if let Err(e) = self.products.append_history(&entry).await {
            tracing::error!(
                external_id = %product.external_id,
                error = %e,
                "Failed to record price history"
            );
            return ProductOutcome::Failed;
        }

        tracing::debug!(
            external_id = %product.external_id,
            title = %product.title,
            old_price = product.current_price,
            new_price,
            currency = %product.currency,
            "Price updated"
        );
        ProductOutcome::Updated
    }
}
