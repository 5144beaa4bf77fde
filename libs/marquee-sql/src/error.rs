//! Errors raised by the SQL adapter
//!
//! Repository methods never leak these: they convert into the aggregate
//! errors of the domain as storage failures.

use marquee_domain::movies::MovieError;
use marquee_domain::ratings::RatingError;
use marquee_domain::transaction::TransactionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlError {
    /// The database rejected a statement or the connection failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the embedded migrations failed
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row cannot be turned back into a domain value
    #[error("Corrupted row in '{table}': {reason}")]
    CorruptRow { table: &'static str, reason: String },
}

impl SqlError {
    pub fn corrupt_row(table: &'static str, reason: impl Into<String>) -> Self {
        Self::CorruptRow {
            table,
            reason: reason.into(),
        }
    }

    /// Whether the statement broke a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SqlError::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<SqlError> for MovieError {
    fn from(err: SqlError) -> Self {
        MovieError::storage_failure(err.to_string())
    }
}

impl From<SqlError> for RatingError {
    fn from(err: SqlError) -> Self {
        RatingError::storage_failure(err.to_string())
    }
}

impl From<SqlError> for TransactionError {
    fn from(err: SqlError) -> Self {
        TransactionError::backend(err.to_string())
    }
}

/// Result type alias for SQL adapter operations
pub type Result<T> = std::result::Result<T, SqlError>;
