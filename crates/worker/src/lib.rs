//! `smartshop-worker` library crate.
//!
//! The price simulation and alert evaluation loop. The binary entrypoint
//! lives in `main.rs`; the modules are public so integration tests can drive
//! a tick against in-memory stores.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod scheduler;
pub mod simulator;
pub mod store;

pub use evaluator::{AlertEvaluator, EvaluationReport};
pub use scheduler::{OverlapPolicy, TickOutcome, TickReport, TickRunner};
pub use simulator::{PriceSimulator, SimulationReport};
