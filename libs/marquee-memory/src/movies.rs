//! In-memory movie repository

use marquee_domain::movies::value_objects::MovieName;
use marquee_domain::movies::{Movie, MovieCriteria, MovieError, MovieRepository, MovieSortField};
use marquee_domain::search::{PageRequest, Sort};
use marquee_domain::MovieId;
use std::future::Future;
use tracing::{debug, instrument};

use crate::store::{page_of, sort_items, InMemoryStore, PoisonedStore};

/// Map-backed implementation of the MovieRepository port
///
/// Clones share the same map. The backing store doubles as the transaction
/// manager, see [`InMemoryMovieRepository::transactions`].
#[derive(Clone, Default)]
pub struct InMemoryMovieRepository {
    store: InMemoryStore<Movie>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transaction handle over the same map
    pub fn transactions(&self) -> InMemoryStore<Movie> {
        self.store.clone()
    }

    fn sorted(
        &self,
        sort: Sort<MovieSortField>,
        filter: impl Fn(&Movie) -> bool,
    ) -> Result<Vec<Movie>, MovieError> {
        let mut movies: Vec<Movie> = self
            .store
            .values()
            .map_err(storage_failure)?
            .into_iter()
            .filter(|movie| filter(movie))
            .collect();

        let compare = sort
            .field
            .map(|field| move |a: &Movie, b: &Movie| field.compare(a, b));
        sort_items(&mut movies, compare, sort.order);

        Ok(movies)
    }
}

fn storage_failure(err: PoisonedStore) -> MovieError {
    MovieError::storage_failure(err.to_string())
}

impl MovieRepository for InMemoryMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    fn add(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        let store = self.store.clone();
        let movie = movie.clone();

        async move {
            store
                .with_items(|items| {
                    if items.values().any(|existing| existing.name() == movie.name()) {
                        return Err(MovieError::already_exists(movie.name().as_str()));
                    }
                    items.insert(movie.id().to_string(), movie);
                    Ok(())
                })
                .map_err(storage_failure)?
        }
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    fn remove(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        let store = self.store.clone();
        let id = *movie.id();

        async move {
            store
                .with_items(|items| items.remove(&id.to_string()))
                .map_err(storage_failure)?
                .map(|_| debug!(movie_id = %id, "Movie removed"))
                .ok_or(MovieError::NotFound(id))
        }
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    fn update(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        let store = self.store.clone();
        let movie = movie.clone();

        async move {
            store
                .with_items(|items| {
                    let key = movie.id().to_string();
                    if !items.contains_key(&key) {
                        return Err(MovieError::NotFound(*movie.id()));
                    }
                    if items
                        .values()
                        .any(|other| other.id() != movie.id() && other.name() == movie.name())
                    {
                        return Err(MovieError::already_exists(movie.name().as_str()));
                    }
                    items.insert(key, movie);
                    Ok(())
                })
                .map_err(storage_failure)?
        }
    }

    fn get(&self, id: &MovieId) -> impl Future<Output = Result<Movie, MovieError>> + Send {
        let store = self.store.clone();
        let id = *id;

        async move {
            store
                .with_items(|items| items.get(&id.to_string()).cloned())
                .map_err(storage_failure)?
                .ok_or(MovieError::NotFound(id))
        }
    }

    fn find_by_movie_name(
        &self,
        name: &MovieName,
    ) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send {
        let store = self.store.clone();
        let name = name.clone();

        async move {
            store
                .with_items(|items| items.values().find(|movie| movie.name() == &name).cloned())
                .map_err(storage_failure)
        }
    }

    #[instrument(skip(self), fields(page = page.page(), per_page = page.per_page()))]
    fn search(
        &self,
        page: PageRequest,
        sort: Sort<MovieSortField>,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send {
        let result = self
            .sorted(sort, |_| true)
            .and_then(|movies| Ok(page_of(&movies, page)?));

        async move { result }
    }

    #[instrument(skip(self, criteria), fields(filters = criteria.filters().len()))]
    fn search_by_criteria(
        &self,
        criteria: &MovieCriteria,
        sort: Sort<MovieSortField>,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send {
        let result = self
            .sorted(sort, |movie| criteria.matches(movie))
            .and_then(|movies| Ok(page_of(&movies, page)?));

        async move { result }
    }

    fn count(&self) -> impl Future<Output = Result<u64, MovieError>> + Send {
        let result = self
            .store
            .with_items(|items| items.len() as u64)
            .map_err(storage_failure);

        async move { result }
    }

    fn find_last(&self) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send {
        let result = self
            .store
            .with_items(|items| {
                items
                    .values()
                    .max_by(|a, b| {
                        a.created_at()
                            .cmp(b.created_at())
                            .then_with(|| a.id().cmp(b.id()))
                    })
                    .cloned()
            })
            .map_err(storage_failure);

        async move { result }
    }
}
