//! Rating handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marquee_domain::ratings::RatingSortField;
use marquee_domain::{MovieId, PageInfo, RatingId, UserId};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::list_params;
use crate::dto::ratings::{
    CreateRatingRequest, PatchRatingRequest, RatingListResponse, RatingResponse,
};
use crate::dto::{ErrorResponse, ListQuery};
use crate::AppState;

fn parse<T>(what: &str, raw: &str) -> ApiResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| ApiError::bad_request(format!("Invalid {}: {}", what, e)))
}

/// Rate a movie
#[utoipa::path(
    post,
    path = "/ratings",
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating created", body = RatingResponse),
        (status = 400, description = "Score out of range or malformed id", body = ErrorResponse),
        (status = 409, description = "User already rated this movie", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn create_rating(
    State(state): State<AppState>,
    Json(payload): Json<CreateRatingRequest>,
) -> ApiResult<(StatusCode, Json<RatingResponse>)> {
    let movie_id: MovieId = parse("movie id", &payload.movie_id)?;
    let user_id: UserId = parse("user id", &payload.user_id)?;

    let rating = state
        .ratings()
        .create(movie_id, user_id, payload.average_rating)
        .await?;

    info!(rating_id = %rating.id(), "Rating created");
    Ok((StatusCode::CREATED, Json(RatingResponse::from(&rating))))
}

/// List ratings page by page
#[utoipa::path(
    get,
    path = "/ratings",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of ratings", body = RatingListResponse),
        (status = 400, description = "Invalid page or sort", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<RatingListResponse>> {
    let (page, sort) = list_params::<RatingSortField>(&query, state.config.default_page_size)?;
    let ratings = state.ratings();

    let items = ratings.search(page, sort).await?;
    let total = ratings.count().await?;

    Ok(Json(RatingListResponse {
        items: items.iter().map(RatingResponse::from).collect(),
        page: PageInfo::for_request(total, &page).into(),
    }))
}

/// Most recent rating
#[utoipa::path(
    get,
    path = "/ratings/last",
    responses(
        (status = 200, description = "Latest rating", body = RatingResponse),
        (status = 404, description = "No rating yet", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn last_rating(State(state): State<AppState>) -> ApiResult<Json<RatingResponse>> {
    state
        .ratings()
        .find_last()
        .await?
        .map(|rating| Json(RatingResponse::from(&rating)))
        .ok_or_else(|| ApiError::not_found("No rating recorded"))
}

/// Fetch a rating
#[utoipa::path(
    get,
    path = "/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    responses(
        (status = 200, description = "Rating found", body = RatingResponse),
        (status = 404, description = "Rating not found", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RatingResponse>> {
    let id: RatingId = parse("rating id", &id)?;
    let rating = state.ratings().get(&id).await?;
    Ok(Json(RatingResponse::from(&rating)))
}

/// Change the score of a rating
#[utoipa::path(
    patch,
    path = "/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    request_body = PatchRatingRequest,
    responses(
        (status = 200, description = "Rating updated", body = RatingResponse),
        (status = 400, description = "Score out of range", body = ErrorResponse),
        (status = 404, description = "Rating not found", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn patch_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PatchRatingRequest>,
) -> ApiResult<Json<RatingResponse>> {
    let id: RatingId = parse("rating id", &id)?;
    let rating = state
        .ratings()
        .update(&id, payload.average_rating)
        .await?;
    Ok(Json(RatingResponse::from(&rating)))
}

/// Delete a rating
#[utoipa::path(
    delete,
    path = "/ratings/{id}",
    params(("id" = String, Path, description = "Rating id")),
    responses(
        (status = 204, description = "Rating deleted"),
        (status = 500, description = "Rating could not be deleted", body = ErrorResponse)
    ),
    tag = "ratings"
)]
pub async fn delete_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id: RatingId = parse("rating id", &id)?;
    state.ratings().delete(&id).await?;

    info!(rating_id = %id, "Rating deleted");
    Ok(StatusCode::NO_CONTENT)
}
