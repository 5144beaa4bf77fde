//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_domain::{MovieError, PaginationError, RatingError};
use tracing::{error, warn};

use crate::dto::ErrorResponse;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }

        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        let status = match err {
            MovieError::NotFound(_) => StatusCode::NOT_FOUND,
            MovieError::AlreadyExists(_) => StatusCode::CONFLICT,
            MovieError::MissingOrEmptyAttributes(_) | MovieError::InvalidData(_) => {
                StatusCode::BAD_REQUEST
            }
            MovieError::CannotBeDeleted(_) | MovieError::StorageFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        let status = match err {
            RatingError::NotFound(_) => StatusCode::NOT_FOUND,
            RatingError::AlreadyExists { .. } => StatusCode::CONFLICT,
            RatingError::InvalidAverageRating(_) | RatingError::InvalidData(_) => {
                StatusCode::BAD_REQUEST
            }
            RatingError::CannotBeDeleted(_) | RatingError::StorageFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        Self::bad_request(err.to_string())
    }
}
