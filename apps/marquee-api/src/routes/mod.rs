//! API routes

pub mod movies;
pub mod ratings;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        movies::{
            CreateMovieRequest, MovieBasicDto, MovieDetailsDto, MovieListResponse, MovieResponse,
            PatchMovieRequest, SearchMoviesRequest,
        },
        ratings::{CreateRatingRequest, PatchRatingRequest, RatingListResponse, RatingResponse},
        ErrorResponse, PageInfoDto,
    },
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::movies::create_movie,
        handlers::movies::list_movies,
        handlers::movies::search_movies,
        handlers::movies::last_movie,
        handlers::movies::get_movie,
        handlers::movies::patch_movie,
        handlers::movies::delete_movie,
        handlers::ratings::create_rating,
        handlers::ratings::list_ratings,
        handlers::ratings::last_rating,
        handlers::ratings::get_rating,
        handlers::ratings::patch_rating,
        handlers::ratings::delete_rating,
        health_handler
    ),
    components(
        schemas(
            MovieBasicDto, MovieDetailsDto, CreateMovieRequest, PatchMovieRequest,
            SearchMoviesRequest, MovieResponse, MovieListResponse,
            CreateRatingRequest, PatchRatingRequest, RatingResponse, RatingListResponse,
            PageInfoDto, ErrorResponse
        )
    ),
    tags(
        (name = "movies", description = "Movie catalog"),
        (name = "ratings", description = "User ratings"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Marquee API",
        version = "0.1.0",
        description = "Movie catalog and rating backend",
        contact(
            name = "Marquee maintainers"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(movies::routes())
        .merge(ratings::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use marquee_sql::MIGRATOR;
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    async fn app() -> Router {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        let config = ApiConfig::from_lookup(|_| None).unwrap();
        create_router(AppState::new(pool, config))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn movie_body(name: &str, year: &str, duration: i64) -> Value {
        json!({
            "basic": {
                "movie_name": name,
                "description": "Test",
                "release_year": year,
                "duration": duration,
                "age_restriction": 0,
                "average_rating": 7.0,
                "production_country": "Italy"
            },
            "details": {"production_locations": ["Rome"], "directors": ["Sergio Leone"]}
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_movie_lifecycle() {
        let app = app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/movies",
            Some(movie_body("Once Upon a Time in the West", "1968", 166)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["details"]["directors"], json!(["Sergio Leone"]));

        let (status, fetched) = send(&app, Method::GET, &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["basic"]["duration"], 166);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/movies/{}", id),
            Some(json!({"duration": 175})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["basic"]["duration"], 175);
        assert_eq!(patched["details"]["production_locations"], json!(["Rome"]));

        let (status, _) = send(&app, Method::DELETE, &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains(&id));

        let (status, _) = send(&app, Method::DELETE, &format!("/movies/{}", id), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_duplicate_movie_is_conflict() {
        let app = app().await;
        let body = movie_body("The Good, the Bad and the Ugly", "1966", 178);

        let (status, _) = send(&app, Method::POST, "/movies", Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, error) = send(&app, Method::POST, "/movies", Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(error["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_and_search_movies() {
        let app = app().await;
        for (name, year, duration) in [("Short", "1990", 20), ("Mid", "1980", 45), ("Long", "1970", 200)] {
            let (status, _) =
                send(&app, Method::POST, "/movies", Some(movie_body(name, year, duration))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, page) = send(
            &app,
            Method::GET,
            "/movies?page=1&per_page=2&sort_by=releaseYear&sort_order=asc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["items"][0]["basic"]["movie_name"], "Long");
        assert_eq!(page["items"].as_array().unwrap().len(), 2);
        assert_eq!(page["page"]["total_items"], 3);
        assert_eq!(page["page"]["last_page"], 2);

        let (status, found) = send(
            &app,
            Method::POST,
            "/movies/search",
            Some(json!({
                "filters": {"min-duration": 10, "max-duration": 60},
                "sort": "duration",
                "order": "desc"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = found["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|movie| movie["basic"]["movie_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Mid", "Short"]);

        let (status, error) = send(
            &app,
            Method::POST,
            "/movies/search",
            Some(json!({"filters": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "Missing or empty attributes: sort, order");

        let (status, last) = send(&app, Method::GET, "/movies/last", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(last["basic"]["movie_name"], "Long");
    }

    #[tokio::test]
    async fn test_invalid_ids_and_pages_are_bad_requests() {
        let app = app().await;

        let (status, _) = send(&app, Method::GET, "/movies/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/movies?page=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/ratings/last", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rating_lifecycle() {
        let app = app().await;
        let movie_id = "01920000-0000-7000-8000-000000000001";
        let user_id = "01920000-0000-7000-8000-000000000002";

        let (status, _) = send(
            &app,
            Method::POST,
            "/ratings",
            Some(json!({"movie_id": movie_id, "user_id": user_id, "average_rating": 10.5})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, created) = send(
            &app,
            Method::POST,
            "/ratings",
            Some(json!({"movie_id": movie_id, "user_id": user_id, "average_rating": 10.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/ratings",
            Some(json!({"movie_id": movie_id, "user_id": user_id, "average_rating": 3.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/ratings/{}", id),
            Some(json!({"average_rating": 4.5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["average_rating"], 4.5);

        let (status, page) = send(&app, Method::GET, "/ratings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"]["total_items"], 1);

        let (status, _) = send(&app, Method::DELETE, &format!("/ratings/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/ratings/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
