//! Rating routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::ratings::{
        create_rating, delete_rating, get_rating, last_rating, list_ratings, patch_rating,
    },
    AppState,
};

/// Create rating routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ratings", post(create_rating).get(list_ratings))
        .route("/ratings/last", get(last_rating))
        .route(
            "/ratings/:id",
            get(get_rating).patch(patch_rating).delete(delete_rating),
        )
}
