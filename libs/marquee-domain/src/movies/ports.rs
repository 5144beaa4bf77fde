//! Port for movie persistence
//!
//! Native async traits with `impl Future` return types keep dispatch static:
//! services are generic over the repository and get monomorphized per adapter.

use std::future::Future;

use super::criteria::MovieCriteria;
use super::entity::Movie;
use super::error::MovieError;
use super::sort::MovieSortField;
use super::value_objects::MovieName;
use crate::ids::MovieId;
use crate::search::{PageRequest, Sort};

/// Port for movie storage
///
/// Implementations must:
/// - reject a second movie with the same name (`MovieError::AlreadyExists`),
///   atomically with the insert
/// - persist a movie and its child entries together
/// - convert infrastructure errors to `MovieError::StorageFailure`
pub trait MovieRepository: Send + Sync {
    /// Persist a new movie with its child entries
    ///
    /// # Errors
    ///
    /// - `MovieError::AlreadyExists` if the name is taken
    /// - `MovieError::StorageFailure` if the backend fails
    fn add(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send;

    /// Delete a movie and its child entries
    ///
    /// # Errors
    ///
    /// Returns `MovieError::NotFound` if the movie is not stored
    fn remove(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send;

    /// Save a modified movie, replacing its child entries
    ///
    /// # Errors
    ///
    /// - `MovieError::NotFound` if the movie is not stored
    /// - `MovieError::AlreadyExists` if the new name belongs to another movie
    fn update(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send;

    /// Load a movie by id
    ///
    /// # Errors
    ///
    /// Returns `MovieError::NotFound` carrying the requested id
    fn get(&self, id: &MovieId) -> impl Future<Output = Result<Movie, MovieError>> + Send;

    /// Look a movie up by its exact name
    fn find_by_movie_name(
        &self,
        name: &MovieName,
    ) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send;

    /// One page of movies in the requested order
    ///
    /// Returns an empty list for pages past the end.
    fn search(
        &self,
        page: PageRequest,
        sort: Sort<MovieSortField>,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send;

    /// One page of the movies matching every filter of `criteria`
    fn search_by_criteria(
        &self,
        criteria: &MovieCriteria,
        sort: Sort<MovieSortField>,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send;

    /// Number of stored movies
    fn count(&self) -> impl Future<Output = Result<u64, MovieError>> + Send;

    /// The most recently created movie
    fn find_last(&self) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send;
}
