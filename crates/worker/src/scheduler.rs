//! Tick scheduling.
//!
//! A tick is one simulation pass followed by one evaluation pass, both
//! stamped with the same timestamp. [`TickRunner`] owns the in-flight guard;
//! [`run`] drives it on a fixed interval until cancelled.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use smartshop_core::types::Timestamp;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::ConfigError;
use crate::evaluator::{AlertEvaluator, EvaluationReport};
use crate::simulator::{PriceSimulator, SimulationReport};

// ---------------------------------------------------------------------------
// Overlap policy
// ---------------------------------------------------------------------------

/// What to do when a tick is requested while another is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Drop the new tick.
    #[default]
    Skip,
    /// Wait for the running tick, then run.
    Queue,
}

impl FromStr for OverlapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "queue" => Ok(Self::Queue),
            _ => Err(ConfigError::Invalid {
                var: "TICK_OVERLAP",
                value: s.to_string(),
                reason: "expected `skip` or `queue`".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick runner
// ---------------------------------------------------------------------------

/// Summary of a completed tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub started_at: Timestamp,
    /// `None` if products could not be listed.
    pub simulation: Option<SimulationReport>,
    /// `None` if alerts could not be listed.
    pub evaluation: Option<EvaluationReport>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum TickOutcome {
    Completed(TickReport),
    /// Another tick was in flight and the policy is [`OverlapPolicy::Skip`].
    Skipped,
}

/// Runs ticks, at most one at a time.
pub struct TickRunner {
    /// Held for the whole tick; doubles as the in-flight guard.
    simulator: Mutex<PriceSimulator>,
    evaluator: AlertEvaluator,
    overlap: OverlapPolicy,
}

impl TickRunner {
    pub fn new(simulator: PriceSimulator, evaluator: AlertEvaluator, overlap: OverlapPolicy) -> Self {
        Self {
            simulator: Mutex::new(simulator),
            evaluator,
            overlap,
        }
    }

    /// Run a tick stamped with the current time.
    pub async fn run_tick(&self) -> TickOutcome {
        self.run_tick_at(Utc::now()).await
    }

    /// Run a tick stamped with `now`.
    pub async fn run_tick_at(&self, now: Timestamp) -> TickOutcome {
        let mut simulator = match self.overlap {
            OverlapPolicy::Skip => match self.simulator.try_lock() {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::warn!("Previous tick still running, skipping this one");
                    return TickOutcome::Skipped;
                }
            },
            OverlapPolicy::Queue => self.simulator.lock().await,
        };

        let started = Instant::now();

        let simulation = match simulator.tick(now).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products, skipping price update");
                None
            }
        };

        let evaluation = match self.evaluator.evaluate(now).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load active alerts");
                None
            }
        };

        let report = TickReport {
            started_at: now,
            simulation,
            evaluation,
            elapsed: started.elapsed(),
        };
        log_report(&report);
        TickOutcome::Completed(report)
    }
}

fn log_report(report: &TickReport) {
    let sim = report.simulation.unwrap_or_default();
    let eval = report.evaluation.unwrap_or_default();
    tracing::info!(
        products = sim.products,
        prices_updated = sim.updated,
        price_failures = sim.failed,
        alerts_evaluated = eval.evaluated,
        alerts_triggered = eval.triggered,
        alerts_rearmed = eval.rearmed,
        alert_failures = eval.failed,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Tick complete"
    );
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Run ticks every `period` until `cancel` fires.
///
/// The first tick runs immediately. Ticks that fall due while one is running
/// are dropped rather than bunched up. Cancellation is only observed between
/// ticks, so a tick in progress always completes. Returns the number of
/// completed ticks.
pub async fn run(runner: Arc<TickRunner>, period: Duration, cancel: CancellationToken) -> u64 {
    tracing::info!(interval_secs = period.as_secs(), "Price simulator started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut completed = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(completed, "Price simulator stopping");
                break;
            }
            _ = interval.tick() => {
                if let TickOutcome::Completed(_) = runner.run_tick().await {
                    completed += 1;
                }
            }
        }
    }

    completed
}
