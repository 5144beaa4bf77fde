//! Domain errors for rating operations

use thiserror::Error;

use crate::ids::{MovieId, RatingId, UserId};
use crate::pagination::PaginationError;
use crate::transaction::TransactionError;

/// Errors that can occur while managing ratings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// No rating with this id
    #[error("Rating {0} not found")]
    NotFound(RatingId),

    /// The user already rated this movie
    #[error("User {user_id} already rated movie {movie_id}")]
    AlreadyExists { movie_id: MovieId, user_id: UserId },

    /// Score outside `[0.0, 10.0]`
    #[error("Average rating must be between 0.0 and 10.0, got {0}")]
    InvalidAverageRating(f64),

    /// The delete transaction failed and was rolled back
    #[error("Rating {0} cannot be deleted")]
    CannotBeDeleted(RatingId),

    /// The provided data is invalid
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The storage backend failed
    #[error("Storage operation failed: {0}")]
    StorageFailure(String),
}

impl RatingError {
    /// Create a storage failure error with a message
    pub fn storage_failure(msg: impl Into<String>) -> Self {
        Self::StorageFailure(msg.into())
    }

    /// Create an invalid data error with a message
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an already-exists error for a (movie, user) pair
    pub fn already_exists(movie_id: MovieId, user_id: UserId) -> Self {
        Self::AlreadyExists { movie_id, user_id }
    }
}

impl From<TransactionError> for RatingError {
    fn from(err: TransactionError) -> Self {
        Self::StorageFailure(err.to_string())
    }
}

impl From<PaginationError> for RatingError {
    fn from(err: PaginationError) -> Self {
        Self::InvalidData(err.to_string())
    }
}

/// Result type alias for rating operations
pub type Result<T> = std::result::Result<T, RatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_names_both_ids() {
        let movie_id = MovieId::new();
        let user_id = UserId::new();
        let err = RatingError::already_exists(movie_id, user_id);

        assert!(err.to_string().contains(&movie_id.to_string()));
        assert!(err.to_string().contains(&user_id.to_string()));
    }

    #[test]
    fn test_invalid_average_rating_message() {
        let err = RatingError::InvalidAverageRating(10.1);
        assert_eq!(
            err.to_string(),
            "Average rating must be between 0.0 and 10.0, got 10.1"
        );
    }
}
