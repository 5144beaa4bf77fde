//! Rating use cases
//!
//! Deletion runs inside a transaction opened on the injected
//! [`TransactionManager`].

use tracing::warn;

use super::entity::{Rating, RatingSortField};
use super::error::RatingError;
use super::ports::RatingRepository;
use super::value_objects::AverageRating;
use crate::ids::{MovieId, RatingId, UserId};
use crate::search::{PageRequest, Sort};
use crate::transaction::TransactionManager;

/// Service for managing user ratings
pub struct RatingService<R, T> {
    repository: R,
    transactions: T,
}

impl<R, T> RatingService<R, T>
where
    R: RatingRepository,
    T: TransactionManager,
{
    pub fn new(repository: R, transactions: T) -> Self {
        Self {
            repository,
            transactions,
        }
    }

    /// Record a user's rating of a movie
    ///
    /// The score is validated before anything touches storage.
    ///
    /// # Errors
    ///
    /// - `RatingError::InvalidAverageRating` if the score is out of range
    /// - `RatingError::AlreadyExists` if the user already rated the movie
    pub async fn create(
        &self,
        movie_id: MovieId,
        user_id: UserId,
        score: f64,
    ) -> Result<Rating, RatingError> {
        let average_rating = AverageRating::new(score)?;

        if self
            .repository
            .find_by_user_id(&movie_id, &user_id)
            .await?
            .is_some()
        {
            return Err(RatingError::already_exists(movie_id, user_id));
        }

        let rating = Rating::create(movie_id, user_id, average_rating);
        self.repository.add(&rating).await?;

        Ok(rating)
    }

    /// Change the score of an existing rating
    pub async fn update(&self, id: &RatingId, score: f64) -> Result<Rating, RatingError> {
        let average_rating = AverageRating::new(score)?;

        let mut rating = self.repository.get(id).await?;
        rating.update(average_rating);
        self.repository.update(&rating).await?;

        Ok(rating)
    }

    /// Delete a rating inside a transaction
    ///
    /// Any failure rolls back and is reported as
    /// `RatingError::CannotBeDeleted`.
    pub async fn delete(&self, id: &RatingId) -> Result<(), RatingError> {
        if let Err(err) = self.transactions.begin().await {
            warn!(rating_id = %id, error = %err, "Could not open delete transaction");
            return Err(RatingError::CannotBeDeleted(*id));
        }

        let result = async {
            let rating = self.repository.get(id).await?;
            self.repository.remove(&rating).await?;
            self.transactions.commit().await?;
            Ok::<_, RatingError>(())
        }
        .await;

        if let Err(err) = result {
            warn!(rating_id = %id, error = %err, "Rating deletion failed, rolling back");
            if let Err(rollback_err) = self.transactions.rollback().await {
                warn!(rating_id = %id, error = %rollback_err, "Rollback failed");
            }
            return Err(RatingError::CannotBeDeleted(*id));
        }

        Ok(())
    }

    pub async fn get(&self, id: &RatingId) -> Result<Rating, RatingError> {
        self.repository.get(id).await
    }

    pub async fn search(
        &self,
        page: PageRequest,
        sort: Sort<RatingSortField>,
    ) -> Result<Vec<Rating>, RatingError> {
        self.repository.search(page, sort).await
    }

    pub async fn count(&self) -> Result<u64, RatingError> {
        self.repository.count().await
    }

    pub async fn find_last(&self) -> Result<Option<Rating>, RatingError> {
        self.repository.find_last().await
    }
}
