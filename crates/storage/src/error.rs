use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Unsupported database url: {0}")]
    UnsupportedUrl(String),

    #[error("Failed to read fixture: {0}")]
    FixtureIo(#[from] std::io::Error),

    #[error("Invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// True when the backing engine could not be reached at all, as opposed
    /// to a query that ran and failed.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            StorageError::Database(
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            )
        )
    }
}

/// A caller-supplied time range that cannot be queried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{field}' must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("range end {to} is earlier than range start {from}")]
    Inverted { from: NaiveDate, to: NaiveDate },
}
