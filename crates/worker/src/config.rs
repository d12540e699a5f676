use std::time::Duration;

use smartshop_core::alert::RearmPolicy;
use smartshop_core::pricing::{PriceRules, DEFAULT_MAX_CHANGE, DEFAULT_PRICE_FLOOR};

use crate::error::ConfigError;
use crate::scheduler::OverlapPolicy;

/// Default time between ticks: 2 minutes.
const DEFAULT_TICK_INTERVAL_SECS: u64 = 120;

/// Worker configuration loaded from environment variables.
///
/// All fields have defaults matching the docker-compose development setup.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL for the `alerts` table.
    pub database_url: String,
    /// MongoDB connection URI.
    pub mongo_uri: String,
    /// MongoDB database holding `products` and `price_history`.
    pub mongo_database: String,
    pub tick_interval: Duration,
    pub price_rules: PriceRules,
    pub rearm: RearmPolicy,
    pub overlap: OverlapPolicy,
    /// Apply `db/migrations` at startup.
    pub run_migrations: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                        |
    /// |----------------------|------------------------------------------------|
    /// | `DATABASE_URL`       | built from `POSTGRES_*` (see below)            |
    /// | `POSTGRES_HOST`      | `postgres`                                     |
    /// | `POSTGRES_PORT`      | `5432`                                         |
    /// | `POSTGRES_DB`        | `smartshop`                                    |
    /// | `POSTGRES_USER`      | `admin`                                        |
    /// | `POSTGRES_PASSWORD`  | `admin123`                                     |
    /// | `MONGO_URI`          | built from `MONGO_*` (see below)               |
    /// | `MONGO_HOST`         | `mongodb`                                      |
    /// | `MONGO_PORT`         | `27017`                                        |
    /// | `MONGO_USER`         | `admin`                                        |
    /// | `MONGO_PASSWORD`     | `admin123`                                     |
    /// | `MONGO_DB`           | `smartshop`                                    |
    /// | `TICK_INTERVAL_SECS` | `120`                                          |
    /// | `PRICE_FLOOR`        | `10.0`                                         |
    /// | `MAX_CHANGE`         | `0.15`                                         |
    /// | `ALERT_REARM`        | `never` (`never` or `when_cleared`)            |
    /// | `TICK_OVERLAP`       | `skip` (`skip` or `queue`)                     |
    /// | `RUN_MIGRATIONS`     | `false`                                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                var("POSTGRES_USER", "admin"),
                var("POSTGRES_PASSWORD", "admin123"),
                var("POSTGRES_HOST", "postgres"),
                var("POSTGRES_PORT", "5432"),
                var("POSTGRES_DB", "smartshop"),
            )
        });

        let mongo_uri = lookup("MONGO_URI").unwrap_or_else(|| {
            format!(
                "mongodb://{}:{}@{}:{}/",
                var("MONGO_USER", "admin"),
                var("MONGO_PASSWORD", "admin123"),
                var("MONGO_HOST", "mongodb"),
                var("MONGO_PORT", "27017"),
            )
        });

        let mongo_database = var("MONGO_DB", "smartshop");

        let tick_secs: u64 = parse(
            "TICK_INTERVAL_SECS",
            lookup("TICK_INTERVAL_SECS"),
            DEFAULT_TICK_INTERVAL_SECS,
        )?;
        if tick_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "TICK_INTERVAL_SECS",
                value: "0".to_string(),
                reason: "interval must be at least one second".to_string(),
            });
        }

        let floor: f64 = parse("PRICE_FLOOR", lookup("PRICE_FLOOR"), DEFAULT_PRICE_FLOOR)?;
        let max_change: f64 =
            parse("MAX_CHANGE", lookup("MAX_CHANGE"), DEFAULT_MAX_CHANGE)?;
        let price_rules =
            PriceRules::new(floor, max_change).map_err(|e| ConfigError::Invalid {
                var: "PRICE_FLOOR/MAX_CHANGE",
                value: format!("{floor}/{max_change}"),
                reason: e.to_string(),
            })?;

        let rearm = match lookup("ALERT_REARM") {
            Some(raw) => raw.parse().map_err(|e: smartshop_core::error::CoreError| {
                ConfigError::Invalid {
                    var: "ALERT_REARM",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => RearmPolicy::default(),
        };

        let overlap = match lookup("TICK_OVERLAP") {
            Some(raw) => raw.parse()?,
            None => OverlapPolicy::default(),
        };

        let run_migrations = parse("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), false)?;

        Ok(Self {
            database_url,
            mongo_uri,
            mongo_database,
            tick_interval: Duration::from_secs(tick_secs),
            price_rules,
            rearm,
            overlap,
            run_migrations,
        })
    }
}

fn parse<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
