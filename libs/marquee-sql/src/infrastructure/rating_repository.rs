//! SQLite implementation of the RatingRepository port

use std::sync::Arc;

use marquee_domain::ratings::{Rating, RatingError, RatingRepository, RatingSortField};
use marquee_domain::search::{PageRequest, Sort};
use marquee_domain::{MovieId, RatingId, UserId};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, error, info, instrument};

use super::rows::{format_timestamp, RatingRow, RATING_COLUMNS};
use super::session::{on_connection, SqlSession};
use super::limit_offset;
use crate::error::SqlError;

/// SQLite-backed rating repository
#[derive(Clone)]
pub struct SqlRatingRepository {
    session: Arc<SqlSession>,
}

impl SqlRatingRepository {
    pub fn new(session: Arc<SqlSession>) -> Self {
        Self { session }
    }

    fn sort_column(field: RatingSortField) -> &'static str {
        match field {
            RatingSortField::MovieId => "movie_id",
            RatingSortField::UserId => "user_id",
            RatingSortField::AverageRating => "average_rating",
            RatingSortField::CreatedAt => "created_at",
        }
    }

    fn write_error(err: SqlError, rating: &Rating) -> RatingError {
        if err.is_unique_violation() {
            RatingError::already_exists(*rating.movie_id(), *rating.user_id())
        } else {
            error!(rating_id = %rating.id(), error = %err, "Rating write failed");
            err.into()
        }
    }
}

fn into_ratings(rows: Vec<RatingRow>) -> Result<Vec<Rating>, SqlError> {
    rows.into_iter().map(Rating::try_from).collect()
}

impl RatingRepository for SqlRatingRepository {
    #[instrument(skip(self, rating), fields(rating_id = %rating.id(), movie_id = %rating.movie_id()))]
    async fn add(&self, rating: &Rating) -> Result<(), RatingError> {
        on_connection!(self.session, |conn| {
            sqlx::query(
                "INSERT INTO rating (id, movie_id, user_id, average_rating, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(rating.id().to_string())
            .bind(rating.movie_id().to_string())
            .bind(rating.user_id().to_string())
            .bind(rating.average_rating().value())
            .bind(format_timestamp(rating.created_at()))
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::write_error(e.into(), rating))
        })?;

        info!("Rating stored");
        Ok(())
    }

    #[instrument(skip(self, rating), fields(rating_id = %rating.id()))]
    async fn remove(&self, rating: &Rating) -> Result<(), RatingError> {
        let deleted = on_connection!(self.session, |conn| {
            sqlx::query("DELETE FROM rating WHERE id = ?")
                .bind(rating.id().to_string())
                .execute(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        if deleted.rows_affected() == 0 {
            return Err(RatingError::NotFound(*rating.id()));
        }
        info!("Rating removed");
        Ok(())
    }

    #[instrument(skip(self, rating), fields(rating_id = %rating.id()))]
    async fn update(&self, rating: &Rating) -> Result<(), RatingError> {
        let updated = on_connection!(self.session, |conn| {
            sqlx::query("UPDATE rating SET average_rating = ? WHERE id = ?")
                .bind(rating.average_rating().value())
                .bind(rating.id().to_string())
                .execute(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        if updated.rows_affected() == 0 {
            return Err(RatingError::NotFound(*rating.id()));
        }
        debug!("Rating updated");
        Ok(())
    }

    #[instrument(skip(self), fields(rating_id = %id))]
    async fn get(&self, id: &RatingId) -> Result<Rating, RatingError> {
        let row: Option<RatingRow> = on_connection!(self.session, |conn| {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
            builder
                .push(RATING_COLUMNS)
                .push(" FROM rating WHERE id = ")
                .push_bind(id.to_string());
            builder
                .build_query_as()
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        match row {
            Some(row) => Ok(Rating::try_from(row)?),
            None => Err(RatingError::NotFound(*id)),
        }
    }

    #[instrument(skip(self), fields(movie_id = %movie_id, user_id = %user_id))]
    async fn find_by_user_id(
        &self,
        movie_id: &MovieId,
        user_id: &UserId,
    ) -> Result<Option<Rating>, RatingError> {
        let row: Option<RatingRow> = on_connection!(self.session, |conn| {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
            builder
                .push(RATING_COLUMNS)
                .push(" FROM rating WHERE movie_id = ")
                .push_bind(movie_id.to_string())
                .push(" AND user_id = ")
                .push_bind(user_id.to_string());
            builder
                .build_query_as()
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        Ok(row.map(Rating::try_from).transpose()?)
    }

    #[instrument(skip(self), fields(page = page.page(), per_page = page.per_page()))]
    async fn search(
        &self,
        page: PageRequest,
        sort: Sort<RatingSortField>,
    ) -> Result<Vec<Rating>, RatingError> {
        let Some((limit, offset)) = limit_offset(&page) else {
            debug!(page = page.page(), per_page = page.per_page(), "Page offset out of range");
            return Ok(Vec::new());
        };

        let rows: Vec<RatingRow> = on_connection!(self.session, |conn| {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
            builder.push(RATING_COLUMNS).push(" FROM rating ORDER BY ");
            match sort.field {
                Some(field) => {
                    builder
                        .push(Self::sort_column(field))
                        .push(" ")
                        .push(sort.order.as_sql())
                        .push(", id ASC");
                }
                None => {
                    builder.push("id ").push(sort.order.as_sql());
                }
            }
            builder
                .push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(offset);

            builder
                .build_query_as()
                .fetch_all(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        debug!(found = rows.len(), "Rating page loaded");
        Ok(into_ratings(rows)?)
    }

    async fn count(&self) -> Result<u64, RatingError> {
        let total: i64 = on_connection!(self.session, |conn| {
            sqlx::query_scalar("SELECT COUNT(*) FROM rating")
                .fetch_one(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;
        Ok(total as u64)
    }

    async fn find_last(&self) -> Result<Option<Rating>, RatingError> {
        let row: Option<RatingRow> = on_connection!(self.session, |conn| {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
            builder
                .push(RATING_COLUMNS)
                .push(" FROM rating ORDER BY created_at DESC, id DESC LIMIT 1");
            builder
                .build_query_as()
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;

        Ok(row.map(Rating::try_from).transpose()?)
    }
}
