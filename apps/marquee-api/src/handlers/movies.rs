//! Movie handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marquee_domain::movies::{MovieBasic, MoviePatch, MovieSortField, SearchMoviesByCriteria};
use marquee_domain::{MovieId, PageInfo};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::list_params;
use crate::dto::movies::{
    CreateMovieRequest, MovieListResponse, MovieResponse, PatchMovieRequest, SearchMoviesRequest,
};
use crate::dto::{ErrorResponse, ListQuery};
use crate::AppState;

fn parse_id(raw: &str) -> ApiResult<MovieId> {
    raw.parse()
        .map_err(|e| ApiError::bad_request(format!("Invalid movie id: {}", e)))
}

/// Create a movie
#[utoipa::path(
    post,
    path = "/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieResponse),
        (status = 400, description = "Invalid movie data", body = ErrorResponse),
        (status = 409, description = "A movie with this name already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovieRequest>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    let basic = MovieBasic::try_from(payload.basic)?;
    let movie = state.movies().create(basic, payload.details.into()).await?;

    info!(movie_id = %movie.id(), "Movie created");
    Ok((StatusCode::CREATED, Json(MovieResponse::from(&movie))))
}

/// List movies page by page
#[utoipa::path(
    get,
    path = "/movies",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of movies", body = MovieListResponse),
        (status = 400, description = "Invalid page or sort", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<MovieListResponse>> {
    let (page, sort) = list_params::<MovieSortField>(&query, state.config.default_page_size)?;
    let movies = state.movies();

    let items = movies.search(page, sort).await?;
    let total = movies.count().await?;

    Ok(Json(MovieListResponse {
        items: items.iter().map(MovieResponse::from).collect(),
        page: Some(PageInfo::for_request(total, &page).into()),
    }))
}

/// Search movies with criteria filters
#[utoipa::path(
    post,
    path = "/movies/search",
    request_body = SearchMoviesRequest,
    responses(
        (status = 200, description = "Matching movies", body = MovieListResponse),
        (status = 400, description = "Missing sort or order, or malformed filters", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn search_movies(
    State(state): State<AppState>,
    Json(payload): Json<SearchMoviesRequest>,
) -> ApiResult<Json<MovieListResponse>> {
    let query = SearchMoviesByCriteria::parse(
        &payload.filters,
        payload.sort.as_deref(),
        payload.order.as_deref(),
        payload.page.unwrap_or(1),
        payload
            .per_page
            .unwrap_or(state.config.default_page_size as i64),
    )?;

    let items = state.movies().search_by_criteria(&query).await?;
    Ok(Json(MovieListResponse {
        items: items.iter().map(MovieResponse::from).collect(),
        page: None,
    }))
}

/// Most recently created movie
#[utoipa::path(
    get,
    path = "/movies/last",
    responses(
        (status = 200, description = "Latest movie", body = MovieResponse),
        (status = 404, description = "Catalog is empty", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn last_movie(State(state): State<AppState>) -> ApiResult<Json<MovieResponse>> {
    match state.movies().find_last().await? {
        Some(movie) => Ok(Json(MovieResponse::from(&movie))),
        None => Err(ApiError::not_found("No movie in the catalog")),
    }
}

/// Fetch a movie
#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie found", body = MovieResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MovieResponse>> {
    let id = parse_id(&id)?;
    let movie = state.movies().get(&id).await?;
    Ok(Json(MovieResponse::from(&movie)))
}

/// Partially update a movie
#[utoipa::path(
    patch,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie id")),
    request_body = PatchMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = MovieResponse),
        (status = 404, description = "Movie not found", body = ErrorResponse),
        (status = 409, description = "Name taken by another movie", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn patch_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PatchMovieRequest>,
) -> ApiResult<Json<MovieResponse>> {
    let id = parse_id(&id)?;
    let patch = MoviePatch::try_from(payload)?;
    let movie = state.movies().update(&id, patch).await?;
    Ok(Json(MovieResponse::from(&movie)))
}

/// Delete a movie
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(("id" = String, Path, description = "Movie id")),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 500, description = "Movie could not be deleted", body = ErrorResponse)
    ),
    tag = "movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.movies().delete(&id).await?;

    info!(movie_id = %id, "Movie deleted");
    Ok(StatusCode::NO_CONTENT)
}
