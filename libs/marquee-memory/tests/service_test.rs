//! Use-case tests for the movie and rating services
//!
//! The services run on the in-memory adapter. A wrapper repository whose
//! `remove` deletes and then fails checks that a failed delete is rolled back.

use std::future::Future;

use marquee_domain::movies::value_objects::*;
use marquee_domain::movies::{
    Movie, MovieBasic, MovieCriteria, MovieDetails, MovieError, MoviePatch, MovieRepository,
    MovieService, MovieSortField, SearchMoviesByCriteria,
};
use marquee_domain::ratings::{RatingError, RatingService};
use marquee_domain::search::{PageRequest, Sort};
use marquee_domain::{MovieId, RatingId, TransactionManager, UserId};
use marquee_memory::{InMemoryMovieRepository, InMemoryRatingRepository};
use serde_json::json;

fn basic(name: &str, duration: i64) -> MovieBasic {
    MovieBasic {
        name: MovieName::new(name).unwrap(),
        description: Description::new("Test movie"),
        release_year: ReleaseYear::new("2004"),
        duration: Duration::new(duration),
        age_restriction: AgeRestriction::new(0),
        average_rating: AverageRating::new(8.0),
        production_country: ProductionCountry::new("Japan"),
    }
}

fn movie_service(
    repository: &InMemoryMovieRepository,
) -> MovieService<InMemoryMovieRepository, marquee_memory::InMemoryStore<Movie>> {
    MovieService::new(repository.clone(), repository.transactions())
}

/// Removes the movie, then reports a storage failure
#[derive(Clone)]
struct FailingRemoveRepository {
    inner: InMemoryMovieRepository,
}

impl MovieRepository for FailingRemoveRepository {
    fn add(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        self.inner.add(movie)
    }

    fn remove(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        let removal = self.inner.remove(movie);
        async move {
            removal.await?;
            Err::<(), _>(MovieError::storage_failure("disk on fire"))
        }
    }

    fn update(&self, movie: &Movie) -> impl Future<Output = Result<(), MovieError>> + Send {
        self.inner.update(movie)
    }

    fn get(&self, id: &MovieId) -> impl Future<Output = Result<Movie, MovieError>> + Send {
        self.inner.get(id)
    }

    fn find_by_movie_name(
        &self,
        name: &MovieName,
    ) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send {
        self.inner.find_by_movie_name(name)
    }

    fn search(
        &self,
        page: PageRequest,
        sort: Sort<MovieSortField>,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send {
        self.inner.search(page, sort)
    }

    fn search_by_criteria(
        &self,
        criteria: &MovieCriteria,
        sort: Sort<MovieSortField>,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Movie>, MovieError>> + Send {
        self.inner.search_by_criteria(criteria, sort, page)
    }

    fn count(&self) -> impl Future<Output = Result<u64, MovieError>> + Send {
        self.inner.count()
    }

    fn find_last(&self) -> impl Future<Output = Result<Option<Movie>, MovieError>> + Send {
        self.inner.find_last()
    }
}

#[tokio::test]
async fn test_create_and_get_movie() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);

    let created = service
        .create(
            basic("Spirited Away", 125),
            MovieDetails {
                directors: vec!["Hayao Miyazaki".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let loaded = service.get(created.id()).await.unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.directors().collect::<Vec<_>>(), vec!["Hayao Miyazaki"]);
}

#[tokio::test]
async fn test_create_duplicate_movie_fails() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);

    service
        .create(basic("Akira", 124), MovieDetails::default())
        .await
        .unwrap();
    let err = service
        .create(basic("Akira", 90), MovieDetails::default())
        .await
        .unwrap_err();

    assert_eq!(err, MovieError::AlreadyExists("Akira".into()));
}

#[tokio::test]
async fn test_patch_movie_replaces_only_given_fields() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    let created = service
        .create(
            basic("Paprika", 90),
            MovieDetails {
                actors: vec!["Megumi Hayashibara".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let patched = service
        .update(
            created.id(),
            MoviePatch {
                duration: Some(Duration::new(94)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.duration().value(), 94);
    assert_eq!(patched.actors().count(), 1);
    assert_eq!(service.get(created.id()).await.unwrap(), patched);
}

#[tokio::test]
async fn test_rename_onto_existing_name_fails() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    service
        .create(basic("Ran", 162), MovieDetails::default())
        .await
        .unwrap();
    let ikiru = service
        .create(basic("Ikiru", 143), MovieDetails::default())
        .await
        .unwrap();

    let err = service
        .update(
            ikiru.id(),
            MoviePatch {
                name: Some(MovieName::new("Ran").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, MovieError::AlreadyExists("Ran".into()));
}

#[tokio::test]
async fn test_patch_unknown_movie_is_not_found() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    let id = MovieId::new();

    let err = service.update(&id, MoviePatch::default()).await.unwrap_err();
    assert_eq!(err, MovieError::NotFound(id));
}

#[tokio::test]
async fn test_delete_movie_commits() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    let created = service
        .create(basic("Tampopo", 114), MovieDetails::default())
        .await
        .unwrap();

    service.delete(created.id()).await.unwrap();

    assert_eq!(
        service.get(created.id()).await.unwrap_err(),
        MovieError::NotFound(*created.id())
    );
    assert!(!repository.transactions().is_active().await);
}

#[tokio::test]
async fn test_failed_delete_rolls_back() {
    let inner = InMemoryMovieRepository::new();
    let transactions = inner.transactions();
    let service = MovieService::new(
        FailingRemoveRepository {
            inner: inner.clone(),
        },
        transactions.clone(),
    );
    let created = service
        .create(basic("Hausu", 88), MovieDetails::default())
        .await
        .unwrap();

    let err = service.delete(created.id()).await.unwrap_err();

    assert_eq!(err, MovieError::CannotBeDeleted(*created.id()));
    assert_eq!(inner.get(created.id()).await.unwrap(), created);
    assert!(!transactions.is_active().await);
}

#[tokio::test]
async fn test_delete_unknown_movie_cannot_be_deleted() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    let id = MovieId::new();

    assert_eq!(
        service.delete(&id).await.unwrap_err(),
        MovieError::CannotBeDeleted(id)
    );
    assert!(!repository.transactions().is_active().await);
}

#[tokio::test]
async fn test_search_by_criteria_query() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);
    for (name, duration) in [("Short", 5), ("Feature", 50), ("Epic", 200)] {
        service
            .create(basic(name, duration), MovieDetails::default())
            .await
            .unwrap();
    }

    let filters = json!({"min-duration": 10, "max-duration": 60});
    let query = SearchMoviesByCriteria::parse(
        filters.as_object().unwrap(),
        Some("duration"),
        Some("asc"),
        1,
        10,
    )
    .unwrap();
    let found = service.search_by_criteria(&query).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name().as_str(), "Feature");
}

#[tokio::test]
async fn test_search_empty_catalog_is_not_an_error() {
    let repository = InMemoryMovieRepository::new();
    let service = movie_service(&repository);

    let movies = service
        .search(PageRequest::new(3, 10).unwrap(), Sort::default())
        .await
        .unwrap();

    assert!(movies.is_empty());
    assert_eq!(service.count().await.unwrap(), 0);
    assert!(service.find_last().await.unwrap().is_none());
}

#[tokio::test]
async fn test_rating_bounds_are_checked_before_storage() {
    let repository = InMemoryRatingRepository::new();
    let service = RatingService::new(repository.clone(), repository.transactions());

    for score in [-0.1, 10.1] {
        let err = service
            .create(MovieId::new(), UserId::new(), score)
            .await
            .unwrap_err();
        assert_eq!(err, RatingError::InvalidAverageRating(score));
    }
    for score in [0.0, 10.0] {
        service
            .create(MovieId::new(), UserId::new(), score)
            .await
            .unwrap();
    }

    assert_eq!(service.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_second_rating_by_same_user_fails() {
    let repository = InMemoryRatingRepository::new();
    let service = RatingService::new(repository.clone(), repository.transactions());
    let movie_id = MovieId::new();
    let user_id = UserId::new();

    service.create(movie_id, user_id, 5.0).await.unwrap();
    let err = service.create(movie_id, user_id, 6.0).await.unwrap_err();

    assert_eq!(err, RatingError::AlreadyExists { movie_id, user_id });
}

#[tokio::test]
async fn test_update_and_delete_rating() {
    let repository = InMemoryRatingRepository::new();
    let service = RatingService::new(repository.clone(), repository.transactions());
    let rating = service
        .create(MovieId::new(), UserId::new(), 4.0)
        .await
        .unwrap();

    let updated = service.update(rating.id(), 8.5).await.unwrap();
    assert_eq!(updated.average_rating().value(), 8.5);
    assert_eq!(
        service.update(rating.id(), 11.0).await.unwrap_err(),
        RatingError::InvalidAverageRating(11.0)
    );

    service.delete(rating.id()).await.unwrap();
    assert_eq!(
        service.get(rating.id()).await.unwrap_err(),
        RatingError::NotFound(*rating.id())
    );

    let unknown = RatingId::new();
    assert_eq!(
        service.delete(&unknown).await.unwrap_err(),
        RatingError::CannotBeDeleted(unknown)
    );
}
