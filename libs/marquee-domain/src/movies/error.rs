//! Domain errors for movie operations
//!
//! Adapters translate their own failures (SQL errors, poisoned locks...) into
//! these variants so nothing above the repository port sees infrastructure
//! error types.

use thiserror::Error;

use crate::ids::MovieId;
use crate::pagination::PaginationError;
use crate::transaction::TransactionError;

/// Errors that can occur while managing movies
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MovieError {
    /// No movie with this id
    #[error("Movie {0} not found")]
    NotFound(MovieId),

    /// Another movie already uses this name
    #[error("Movie '{0}' already exists")]
    AlreadyExists(String),

    /// The delete transaction failed and was rolled back
    #[error("Movie {0} cannot be deleted")]
    CannotBeDeleted(MovieId),

    /// Required query attributes were missing or blank
    #[error("Missing or empty attributes: {}", .0.join(", "))]
    MissingOrEmptyAttributes(Vec<String>),

    /// The provided data is invalid
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The storage backend failed
    #[error("Storage operation failed: {0}")]
    StorageFailure(String),
}

impl MovieError {
    /// Create a storage failure error with a message
    pub fn storage_failure(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    /// Create an invalid data error with a message
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an already-exists error for a movie name
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists(name.into())
    }

    /// Create a missing attributes error from attribute names
    pub fn missing_attributes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingOrEmptyAttributes(names.into_iter().map(Into::into).collect())
    }
}

impl From<TransactionError> for MovieError {
    fn from(err: TransactionError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<PaginationError> for MovieError {
    fn from(err: PaginationError) -> Self {
        Self::InvalidData(err.to_string())
    }
}

/// Result type alias for movie operations
pub type Result<T> = std::result::Result<T, MovieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let id = MovieId::new();
        let err = MovieError::NotFound(id);
        assert_eq!(err.to_string(), format!("Movie {} not found", id));
    }

    #[test]
    fn test_missing_attributes_error() {
        let err = MovieError::missing_attributes(["sort", "order"]);
        assert_eq!(
            err,
            MovieError::MissingOrEmptyAttributes(vec!["sort".into(), "order".into()])
        );
        assert_eq!(err.to_string(), "Missing or empty attributes: sort, order");
    }

    #[test]
    fn test_transaction_error_becomes_storage_failure() {
        let err: MovieError = TransactionError::NotActive.into();
        assert!(matches!(err, MovieError::StorageFailure(_)));
    }

    #[test]
    fn test_pagination_error_becomes_invalid_data() {
        let err: MovieError = PaginationError::InvalidPage(0).into();
        assert!(err.to_string().contains("Invalid data"));
    }
}
