//! In-memory rating repository

use marquee_domain::ratings::{Rating, RatingError, RatingRepository, RatingSortField};
use marquee_domain::search::{PageRequest, Sort};
use marquee_domain::{MovieId, RatingId, UserId};
use std::future::Future;
use tracing::instrument;

use crate::store::{page_of, sort_items, InMemoryStore, PoisonedStore};

/// Map-backed implementation of the RatingRepository port
#[derive(Clone, Default)]
pub struct InMemoryRatingRepository {
    store: InMemoryStore<Rating>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transaction handle over the same map
    pub fn transactions(&self) -> InMemoryStore<Rating> {
        self.store.clone()
    }
}

fn storage_failure(err: PoisonedStore) -> RatingError {
    RatingError::storage_failure(err.to_string())
}

impl RatingRepository for InMemoryRatingRepository {
    #[instrument(skip(self, rating), fields(rating_id = %rating.id()))]
    fn add(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send {
        let store = self.store.clone();
        let rating = rating.clone();

        async move {
            store
                .with_items(|items| {
                    if items.values().any(|existing| {
                        existing.movie_id() == rating.movie_id()
                            && existing.user_id() == rating.user_id()
                    }) {
                        return Err(RatingError::already_exists(
                            *rating.movie_id(),
                            *rating.user_id(),
                        ));
                    }
                    items.insert(rating.id().to_string(), rating);
                    Ok(())
                })
                .map_err(storage_failure)?
        }
    }

    #[instrument(skip(self, rating), fields(rating_id = %rating.id()))]
    fn remove(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send {
        let store = self.store.clone();
        let id = *rating.id();

        async move {
            store
                .with_items(|items| items.remove(&id.to_string()))
                .map_err(storage_failure)?
                .map(|_| ())
                .ok_or(RatingError::NotFound(id))
        }
    }

    #[instrument(skip(self, rating), fields(rating_id = %rating.id()))]
    fn update(&self, rating: &Rating) -> impl Future<Output = Result<(), RatingError>> + Send {
        let store = self.store.clone();
        let rating = rating.clone();

        async move {
            store
                .with_items(|items| match items.get_mut(&rating.id().to_string()) {
                    Some(stored) => {
                        *stored = rating;
                        Ok(())
                    }
                    None => Err(RatingError::NotFound(*rating.id())),
                })
                .map_err(storage_failure)?
        }
    }

    fn get(&self, id: &RatingId) -> impl Future<Output = Result<Rating, RatingError>> + Send {
        let store = self.store.clone();
        let id = *id;

        async move {
            store
                .with_items(|items| items.get(&id.to_string()).cloned())
                .map_err(storage_failure)?
                .ok_or(RatingError::NotFound(id))
        }
    }

    fn find_by_user_id(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Rating>, RatingError>> + Send {
        let result = self
            .store
            .with_items(|items| {
                items
                    .values()
                    .find(|rating| rating.movie_id() == movie_id && rating.user_id() == user_id)
                    .cloned()
            })
            .map_err(storage_failure);

        async move { result }
    }

    #[instrument(skip(self), fields(page = page.page(), per_page = page.per_page()))]
    fn search(
        &self,
        page: PageRequest,
        sort: Sort<RatingSortField>,
    ) -> impl Future<Output = Result<Vec<Rating>, RatingError>> + Send {
        let result = self.store.values().map_err(storage_failure).and_then(|mut ratings| {
            let compare = sort
                .field
                .map(|field| move |a: &Rating, b: &Rating| field.compare(a, b));
            sort_items(&mut ratings, compare, sort.order);
            Ok(page_of(&ratings, page)?)
        });

        async move { result }
    }

    fn count(&self) -> impl Future<Output = Result<u64, RatingError>> + Send {
        let result = self
            .store
            .with_items(|items| items.len() as u64)
            .map_err(storage_failure);

        async move { result }
    }

    fn find_last(&self) -> impl Future<Output = Result<Option<Rating>, RatingError>> + Send {
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
