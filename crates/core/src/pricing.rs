//! Price perturbation rules for the simulator.
//!
//! A tick moves every product price by a uniformly drawn percentage, clamps
//! the result at a floor, and rounds to whole cents. Everything here is pure
//! except [`draw_change`], which takes the random source as an argument.

use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest price a simulated product can reach, in currency units.
pub const DEFAULT_PRICE_FLOOR: f64 = 10.0;

/// Largest relative move per tick (0.15 = 15% either way).
pub const DEFAULT_MAX_CHANGE: f64 = 0.15;

/// Currency assumed for products that carry none.
pub const DEFAULT_CURRENCY: &str = "EUR";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Bounds applied to every simulated price move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRules {
    /// Minimum resulting price.
    pub floor: f64,
    /// Maximum absolute relative change, in `0.0..1.0`.
    pub max_change: f64,
}

impl Default for PriceRules {
    fn default() -> Self {
        Self {
            floor: DEFAULT_PRICE_FLOOR,
            max_change: DEFAULT_MAX_CHANGE,
        }
    }
}

impl PriceRules {
    /// Build a rule set, rejecting a negative floor or a change bound outside
    /// `[0.0, 1.0)`.
    pub fn new(floor: f64, max_change: f64) -> Result<Self, CoreError> {
        if !floor.is_finite() || floor < 0.0 {
            return Err(CoreError::Validation(format!(
                "price floor must be a non-negative number, got {floor}"
            )));
        }
        if !(0.0..1.0).contains(&max_change) {
            return Err(CoreError::Validation(format!(
                "max change must be in [0.0, 1.0), got {max_change}"
            )));
        }
        Ok(Self { floor, max_change })
    }

    /// Draw a change and apply it to `current`.
    pub fn perturb<R: Rng>(&self, current: f64, rng: &mut R) -> f64 {
        let change = draw_change(rng, self.max_change);
        next_price(current, change, self.floor)
    }
}

/// Draw a uniformly distributed relative change in `[-max_change, +max_change]`.
pub fn draw_change<R: Rng>(rng: &mut R, max_change: f64) -> f64 {
    if max_change <= 0.0 {
        return 0.0;
    }
    rng.random_range(-max_change..=max_change)
}

/// Apply `change` to `current`, clamp at `floor`, and round to cents.
///
/// The floor is applied before rounding, so a floor with more than two
/// decimals is itself rounded.
pub fn next_price(current: f64, change: f64, floor: f64) -> f64 {
    round_to_cents((current * (1.0 + change)).max(floor))
}

/// Round half away from zero to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
