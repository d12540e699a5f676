use smartshop_core::error::CoreError;

/// Failure reported by a [`crate::store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Invalid worker configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
