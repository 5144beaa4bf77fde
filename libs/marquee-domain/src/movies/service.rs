//! Movie use cases
//!
//! The service coordinates the Movie aggregate, the repository port and the
//! transaction port. It holds no state of its own: one instance is built per
//! request around that request's storage session.

use tracing::warn;

use super::criteria::SearchMoviesByCriteria;
use super::entity::{Movie, MovieBasic, MovieDetails, MoviePatch};
use super::error::MovieError;
use super::ports::MovieRepository;
use super::sort::MovieSortField;
use crate::ids::MovieId;
use crate::search::{PageRequest, Sort};
use crate::transaction::TransactionManager;

/// Service for managing the movie catalog
///
/// Generic over the repository `R` and the transaction manager `T`; both
/// usually wrap the same storage session.
pub struct MovieService<R, T> {
    repository: R,
    transactions: T,
}

impl<R, T> MovieService<R, T>
where
    R: MovieRepository,
    T: TransactionManager,
{
    pub fn new(repository: R, transactions: T) -> Self {
        Self {
            repository,
            transactions,
        }
    }

    /// Register a new movie
    ///
    /// # Errors
    ///
    /// - `MovieError::AlreadyExists` if a movie with this name exists
    /// - `MovieError::StorageFailure` if persistence fails
    pub async fn create(&self, basic: MovieBasic, details: MovieDetails) -> Result<Movie, MovieError> {
        // Fast path; the storage constraint still settles concurrent inserts
        if self
            .repository
            .find_by_movie_name(&basic.name)
            .await?
            .is_some()
        {
            return Err(MovieError::already_exists(basic.name.as_str()));
        }

        let movie = Movie::create(basic, details);
        self.repository.add(&movie).await?;

        Ok(movie)
    }

    /// Apply a partial update to an existing movie
    ///
    /// # Errors
    ///
    /// - `MovieError::NotFound` if no movie has this id
    /// - `MovieError::AlreadyExists` if the new name belongs to another movie
    pub async fn update(&self, id: &MovieId, patch: MoviePatch) -> Result<Movie, MovieError> {
        let mut movie = self.repository.get(id).await?;

        if let Some(name) = patch.name.as_ref().filter(|name| *name != movie.name()) {
            if let Some(owner) = self.repository.find_by_movie_name(name).await? {
                if owner.id() != movie.id() {
                    return Err(MovieError::already_exists(name.as_str()));
                }
            }
        }

        movie.update(patch);
        self.repository.update(&movie).await?;

        Ok(movie)
    }

    /// Delete a movie inside a transaction
    ///
    /// Any failure, a missing movie included, rolls the transaction back and
    /// is reported as `MovieError::CannotBeDeleted`. The cause is logged.
    pub async fn delete(&self, id: &MovieId) -> Result<(), MovieError> {
        if let Err(err) = self.transactions.begin().await {
            warn!(movie_id = %id, error = %err, "Could not open delete transaction");
            return Err(MovieError::CannotBeDeleted(*id));
        }

        let result = async {
            let movie = self.repository.get(id).await?;
            self.repository.remove(&movie).await?;
            self.transactions.commit().await?;
            Ok::<_, MovieError>(())
        }
        .await;

        if let Err(err) = result {
            warn!(movie_id = %id, error = %err, "Movie deletion failed, rolling back");
            if let Err(rollback_err) = self.transactions.rollback().await {
                warn!(movie_id = %id, error = %rollback_err, "Rollback failed");
            }
            return Err(MovieError::CannotBeDeleted(*id));
        }

        Ok(())
    }

    /// Load a movie by id
    pub async fn get(&self, id: &MovieId) -> Result<Movie, MovieError> {
        self.repository.get(id).await
    }

    /// One page of the catalog
    pub async fn search(
        &self,
        page: PageRequest,
        sort: Sort<MovieSortField>,
    ) -> Result<Vec<Movie>, MovieError> {
        self.repository.search(page, sort).await
    }

    /// One page of the movies matching a criteria query
    pub async fn search_by_criteria(
        &self,
        query: &SearchMoviesByCriteria,
    ) -> Result<Vec<Movie>, MovieError> {
        self.repository
            .search_by_criteria(&query.criteria, query.sort, query.page)
            .await
    }

    /// Total number of movies
    pub async fn count(&self) -> Result<u64, MovieError> {
        self.repository.count().await
    }

    /// The most recently created movie, if any
    pub async fn find_last(&self) -> Result<Option<Movie>, MovieError> {
        self.repository.find_last().await
    }
}
