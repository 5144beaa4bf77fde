//! Movie routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::movies::{
        create_movie, delete_movie, get_movie, last_movie, list_movies, patch_movie,
        search_movies,
    },
    AppState,
};

/// Create movie routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", post(create_movie).get(list_movies))
        .route("/movies/last", get(last_movie))
        .route("/movies/search", post(search_movies))
        .route(
            "/movies/:id",
            get(get_movie).patch(patch_movie).delete(delete_movie),
        )
}
