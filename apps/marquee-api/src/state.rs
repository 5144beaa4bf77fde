//! Application state shared across handlers

use std::sync::Arc;

use marquee_domain::{MovieService, RatingService};
use marquee_sql::{SqlMovieRepository, SqlRatingRepository, SqlSession};
use sqlx::SqlitePool;

use crate::config::ApiConfig;

pub type Movies = MovieService<SqlMovieRepository, Arc<SqlSession>>;
pub type Ratings = RatingService<SqlRatingRepository, Arc<SqlSession>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ApiConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Movie use cases bound to a fresh session
    ///
    /// Sessions carry transaction state, so each request gets its own.
    pub fn movies(&self) -> Movies {
        let session = Arc::new(SqlSession::new(self.pool.clone()));
        MovieService::new(SqlMovieRepository::new(session.clone()), session)
    }

    pub fn ratings(&self) -> Ratings {
        let session = Arc::new(SqlSession::new(self.pool.clone()));
        RatingService::new(SqlRatingRepository::new(session.clone()), session)
    }
}
