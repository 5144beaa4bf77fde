//! Storage port for ratings

use std::future::Future;

use super::entity::{Rating, RatingSortField};
use super::error::RatingError;
use crate::ids::{MovieId, RatingId, UserId};
use crate::search::{PageRequest, Sort};

/// Port for rating storage
///
/// Implementations must reject a second rating for the same
/// `(movie_id, user_id)` pair with `RatingError::AlreadyExists`.
pub trait RatingRepository: Send + Sync {
    /// Persist a new rating
    fn add(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send;

    /// Delete a rating
    ///
    /// # Errors
    ///
    /// Returns `RatingError::NotFound` if the rating is not stored
    fn remove(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send;

    /// Save a modified rating
    fn update(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send;

    /// Load a rating by id
    ///
    /// # Errors
    ///
    /// Returns `RatingError::NotFound` carrying the requested id
    fn get(&self, id: &RatingId) -> impl Future<Output = Result<Rating, RatingError>> + Send;

    /// The rating a user gave a movie, if any
    fn find_by_user_id(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Rating>, RatingError>> + Send;

    /// One page of ratings in the requested order
    fn search(
        &self,
        page: PageRequest,
        sort: Sort<RatingSortField>,
    ) -> impl Future<Output = Result<Vec<Rating>, RatingError>> + Send;

    /// Number of stored ratings
    fn count(&self) -> impl Future<Output = Result<u64, RatingError>> + Send;

    /// The most recently created rating
    fn find_last(&self) -> impl Future<Output = Result<Option<Rating>, RatingError>> + Send;
}
