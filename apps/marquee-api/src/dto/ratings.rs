//! DTOs for rating endpoints

use chrono::{DateTime, Utc};
use marquee_domain::Rating;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PageInfoDto;

/// Request body for rating creation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRatingRequest {
    #[schema(example = "01920000-0000-7000-8000-000000000000")]
    pub movie_id: String,
    #[schema(example = "01920000-0000-7000-8000-0000000000ff")]
    pub user_id: String,
    /// Between 0 and 10 inclusive
    #[schema(example = 7.5)]
    pub average_rating: f64,
}

/// Request body for a rating update
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchRatingRequest {
    #[schema(example = 9.0)]
    pub average_rating: f64,
}

/// A rating as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingResponse {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Rating> for RatingResponse {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id().to_string(),
            movie_id: rating.movie_id().to_string(),
            user_id: rating.user_id().to_string(),
            average_rating: rating.average_rating().value(),
            created_at: *rating.created_at(),
        }
    }
}

/// One page of ratings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RatingListResponse {
    pub items: Vec<RatingResponse>,
    pub page: PageInfoDto,
}
