//! `smartshop-worker` -- price simulation and alert evaluation daemon.
//!
//! Perturbs every product price on a fixed interval, records price history,
//! and stamps alerts whose condition holds. Runs until SIGINT/SIGTERM, then
//! lets the current tick finish and closes both database connections.
//!
//! See [`smartshop_worker::config::WorkerConfig::from_env`] for the
//! environment variables it reads.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartshop_worker::config::WorkerConfig;
use smartshop_worker::scheduler::{self, TickRunner};
use smartshop_worker::store::{AlertStore, MongoProductStore, PgAlertStore, ProductStore};
use smartshop_worker::{AlertEvaluator, PriceSimulator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartshop_worker=info,smartshop_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env()?;
    tracing::info!(
        mongo_database = %config.mongo_database,
        interval_secs = config.tick_interval.as_secs(),
        price_floor = config.price_rules.floor,
        max_change = config.price_rules.max_change,
        rearm = ?config.rearm,
        overlap = ?config.overlap,
        "Loaded worker configuration"
    );

    // --- PostgreSQL ---
    // Connections open on first use; an unreachable server is logged here and
    // then surfaces as per-tick errors.
    let pool = smartshop_db::create_lazy_pool(&config.database_url)?;
    match smartshop_db::health_check(&pool).await {
        Ok(()) => tracing::info!("PostgreSQL health check passed"),
        Err(e) => tracing::error!(error = %e, "PostgreSQL unreachable at startup"),
    }

    if config.run_migrations {
        match smartshop_db::run_migrations(&pool).await {
            Ok(()) => tracing::info!("Database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to run database migrations"),
        }
    }

    // --- MongoDB ---
    let (mongo_client, mongo_db) =
        smartshop_db::connect_mongo(&config.mongo_uri, &config.mongo_database).await?;
    match smartshop_db::mongo_health_check(&mongo_db).await {
        Ok(()) => tracing::info!("MongoDB health check passed"),
        Err(e) => tracing::error!(error = %e, "MongoDB unreachable at startup"),
    }

    // --- Tick runner ---
    let products: Arc<dyn ProductStore> = Arc::new(MongoProductStore::new(mongo_db));
    let alerts: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool.clone()));

    let simulator = PriceSimulator::new(Arc::clone(&products), config.price_rules);
    let evaluator = AlertEvaluator::new(alerts, products, config.rearm);
    let runner = Arc::new(TickRunner::new(simulator, evaluator, config.overlap));

    let cancel = CancellationToken::new();
    let scheduler_handle = tokio::spawn(scheduler::run(
        runner,
        config.tick_interval,
        cancel.clone(),
    ));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, waiting for the current tick");

    cancel.cancel();
    let ticks = scheduler_handle.await?;

    // --- Post-shutdown cleanup ---
    pool.close().await;
    tracing::info!("PostgreSQL pool closed");

    mongo_client.shutdown().await;
    tracing::info!("MongoDB client shut down");

    tracing::info!(ticks, "Worker stopped");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
