use thiserror::Error;

/// Errors raised by the product catalog or the profile store
///
/// These are never recovered locally; callers decide how to surface them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLx error: {0}")]
    SqlxError(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StorageError {
    /// Pool exhaustion and shutdown are reported as an unreachable store
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::Unavailable(err.to_string())
            }
            other => StorageError::SqlxError(other),
        }
    }
}

/// Malformed or missing request input
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing {0} data")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Validation failed: {0}")]
    Fields(#[from] validator::ValidationErrors),
}
