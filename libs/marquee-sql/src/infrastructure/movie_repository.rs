//! SQLite implementation of the MovieRepository port
//!
//! A movie spans two tables: one `movies` row and one `movie_details` row per
//! child entry. Writes touching both run in a single transaction.

use std::collections::HashMap;
use std::sync::Arc;

use marquee_domain::movies::value_objects::MovieName;
use marquee_domain::movies::{
    Movie, MovieCriteria, MovieDetail, MovieError, MovieRepository, MovieSortField,
};
use marquee_domain::search::{PageRequest, Sort};
use marquee_domain::MovieId;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, error, info, instrument};

use super::criteria::MovieCriteriaApplicator;
use super::limit_offset;
use super::rows::{format_timestamp, MovieDetailRow, MovieRow, MOVIE_COLUMNS};
use super::session::{in_transaction, on_connection, SqlSession};
use crate::error::SqlError;

/// SQLite-backed movie repository
///
/// Statements go through the shared [`SqlSession`], so they join whatever
/// transaction the session has open.
#[derive(Clone)]
pub struct SqlMovieRepository {
    session: Arc<SqlSession>,
    criteria: Arc<MovieCriteriaApplicator>,
}

impl SqlMovieRepository {
    pub fn new(session: Arc<SqlSession>) -> Self {
        Self {
            session,
            criteria: Arc::new(MovieCriteriaApplicator::default()),
        }
    }

    fn sort_column(field: MovieSortField) -> &'static str {
        match field {
            MovieSortField::MovieName => "m.name",
            MovieSortField::ReleaseYear => "m.release_year",
            MovieSortField::Duration => "m.duration",
            MovieSortField::AgeRestriction => "m.age_restriction",
            MovieSortField::AverageRating => "m.average_rating",
            MovieSortField::CreatedAt => "m.created_at",
        }
    }

    fn push_order_and_page(
        builder: &mut QueryBuilder<'_, Sqlite>,
        sort: Sort<MovieSortField>,
        (limit, offset): (i64, i64),
    ) {
        builder.push(" ORDER BY ");
        match sort.field {
            Some(field) => {
                builder
                    .push(Self::sort_column(field))
                    .push(" ")
                    .push(sort.order.as_sql())
                    .push(", m.id ASC");
            }
            None => {
                builder.push("m.id ").push(sort.order.as_sql());
            }
        }
        builder
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
    }
}

fn unique_name_violation(err: SqlError, movie: &Movie) -> MovieError {
    if err.is_unique_violation() {
        MovieError::already_exists(movie.name().as_str())
    } else {
        error!(movie_id = %movie.id(), error = %err, "Movie write failed");
        err.into()
    }
}

async fn insert_details(conn: &mut SqliteConnection, movie: &Movie) -> Result<(), SqlError> {
    if movie.details().is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "INSERT INTO movie_details (id, movie_id, kind, value, position) ",
    );
    builder.push_values(
        movie.details().iter().enumerate(),
        |mut row, (position, detail)| {
            row.push_bind(detail.id().to_string())
                .push_bind(detail.movie_id().to_string())
                .push_bind(detail.kind().as_str().to_string())
                .push_bind(detail.value().to_string())
                .push_bind(position as i64);
        },
    );
    builder.build().execute(&mut *conn).await?;

    Ok(())
}

async fn insert_movie(conn: &mut SqliteConnection, movie: &Movie) -> Result<(), MovieError> {
    sqlx::query(
        "INSERT INTO movies (id, name, description, release_year, duration, age_restriction, \
         average_rating, production_country, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(movie.id().to_string())
    .bind(movie.name().as_str().to_string())
    .bind(movie.description().as_str().to_string())
    .bind(movie.release_year().as_str().to_string())
    .bind(movie.duration().value())
    .bind(movie.age_restriction().value())
    .bind(movie.average_rating().value())
    .bind(movie.production_country().as_str().to_string())
    .bind(format_timestamp(movie.created_at()))
    .execute(&mut *conn)
    .await
    .map_err(|e| unique_name_violation(e.into(), movie))?;

    insert_details(conn, movie).await?;
    Ok(())
}

async fn update_movie(conn: &mut SqliteConnection, movie: &Movie) -> Result<(), MovieError> {
    let updated = sqlx::query(
        "UPDATE movies SET name = ?, description = ?, release_year = ?, duration = ?, \
         age_restriction = ?, average_rating = ?, production_country = ? WHERE id = ?",
    )
    .bind(movie.name().as_str().to_string())
    .bind(movie.description().as_str().to_string())
    .bind(movie.release_year().as_str().to_string())
    .bind(movie.duration().value())
    .bind(movie.age_restriction().value())
    .bind(movie.average_rating().value())
    .bind(movie.production_country().as_str().to_string())
    .bind(movie.id().to_string())
    .execute(&mut *conn)
    .await
    .map_err(|e| unique_name_violation(e.into(), movie))?;

    if updated.rows_affected() == 0 {
        return Err(MovieError::NotFound(*movie.id()));
    }

    // Child collections are replaced wholesale
    sqlx::query("DELETE FROM movie_details WHERE movie_id = ?")
        .bind(movie.id().to_string())
        .execute(&mut *conn)
        .await
        .map_err(SqlError::from)?;
    insert_details(conn, movie).await?;

    Ok(())
}

async fn delete_movie(conn: &mut SqliteConnection, id: &MovieId) -> Result<(), MovieError> {
    sqlx::query("DELETE FROM movie_details WHERE movie_id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(SqlError::from)?;

    let deleted = sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(SqlError::from)?;

    if deleted.rows_affected() == 0 {
        return Err(MovieError::NotFound(*id));
    }
    Ok(())
}

/// Load the child entries of the given movies and rebuild the aggregates,
/// keeping the order of `rows`
async fn hydrate(
    conn: &mut SqliteConnection,
    rows: Vec<MovieRow>,
) -> Result<Vec<Movie>, SqlError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, movie_id, kind, value FROM movie_details WHERE movie_id IN (",
    );
    let mut ids = builder.separated(", ");
    for row in &rows {
        ids.push_bind(row.id.clone());
    }
    ids.push_unseparated(") ORDER BY movie_id, position");

    let detail_rows: Vec<MovieDetailRow> = builder
        .build_query_as()
        .fetch_all(&mut *conn)
        .await?;

    let mut details: HashMap<String, Vec<MovieDetail>> = HashMap::new();
    for row in detail_rows {
        let movie_id = row.movie_id.clone();
        details.entry(movie_id).or_default().push(row.try_into()?);
    }

    rows.into_iter()
        .map(|row| {
            let entries = details.remove(&row.id).unwrap_or_default();
            row.into_movie(entries)
        })
        .collect()
}

async fn fetch_one(
    conn: &mut SqliteConnection,
    column: &'static str,
    value: String,
) -> Result<Option<Movie>, SqlError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder
        .push(MOVIE_COLUMNS)
        .push(" FROM movies m WHERE ")
        .push(column)
        .push(" = ")
        .push_bind(value);

    let row: Option<MovieRow> = builder.build_query_as().fetch_optional(&mut *conn).await?;
    let movies = hydrate(conn, row.into_iter().collect()).await?;

    Ok(movies.into_iter().next())
}

async fn fetch_page(
    conn: &mut SqliteConnection,
    applicator: &MovieCriteriaApplicator,
    criteria: Option<&MovieCriteria>,
    sort: Sort<MovieSortField>,
    page: PageRequest,
) -> Result<Vec<Movie>, SqlError> {
    let Some(bounds) = limit_offset(&page) else {
        debug!(page = page.page(), per_page = page.per_page(), "Page offset out of range");
        return Ok(Vec::new());
    };

    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder.push(MOVIE_COLUMNS).push(" FROM movies m WHERE 1 = 1");
    if let Some(criteria) = criteria {
        applicator.apply(criteria, &mut builder);
    }
    SqlMovieRepository::push_order_and_page(&mut builder, sort, bounds);

    let rows: Vec<MovieRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
    hydrate(conn, rows).await
}

impl MovieRepository for SqlMovieRepository {
    #[instrument(skip(self, movie), fields(movie_id = %movie.id(), name = %movie.name()))]
    async fn add(&self, movie: &Movie) -> Result<(), MovieError> {
        in_transaction!(self.session, |conn| insert_movie(conn, movie).await)?;
        info!(details = movie.details().len(), "Movie stored");
        Ok(())
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    async fn remove(&self, movie: &Movie) -> Result<(), MovieError> {
        in_transaction!(self.session, |conn| delete_movie(conn, movie.id()).await)?;
        info!("Movie removed");
        Ok(())
    }

    #[instrument(skip(self, movie), fields(movie_id = %movie.id()))]
    async fn update(&self, movie: &Movie) -> Result<(), MovieError> {
        in_transaction!(self.session, |conn| update_movie(conn, movie).await)?;
        debug!("Movie updated");
        Ok(())
    }

    #[instrument(skip(self), fields(movie_id = %id))]
    async fn get(&self, id: &MovieId) -> Result<Movie, MovieError> {
        let movie = on_connection!(self.session, |conn| {
            fetch_one(conn, "m.id", id.to_string()).await
        })?;
        movie.ok_or(MovieError::NotFound(*id))
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn find_by_movie_name(&self, name: &MovieName) -> Result<Option<Movie>, MovieError> {
        let movie = on_connection!(self.session, |conn| {
            fetch_one(conn, "m.name", name.as_str().to_string()).await
        })?;
        Ok(movie)
    }

    #[instrument(skip(self), fields(page = page.page(), per_page = page.per_page()))]
    async fn search(
        &self,
        page: PageRequest,
        sort: Sort<MovieSortField>,
    ) -> Result<Vec<Movie>, MovieError> {
        let movies = on_connection!(self.session, |conn| {
            fetch_page(conn, &self.criteria, None, sort, page).await
        })?;
        debug!(found = movies.len(), "Movie page loaded");
        Ok(movies)
    }

    #[instrument(skip(self, criteria), fields(filters = criteria.filters().len()))]
    async fn search_by_criteria(
        &self,
        criteria: &MovieCriteria,
        sort: Sort<MovieSortField>,
        page: PageRequest,
    ) -> Result<Vec<Movie>, MovieError> {
        let movies = on_connection!(self.session, |conn| {
            fetch_page(conn, &self.criteria, Some(criteria), sort, page).await
        })?;
        debug!(found = movies.len(), "Criteria search done");
        Ok(movies)
    }

    async fn count(&self) -> Result<u64, MovieError> {
        let total: i64 = on_connection!(self.session, |conn| {
            sqlx::query_scalar("SELECT COUNT(*) FROM movies")
                .fetch_one(&mut *conn)
                .await
                .map_err(SqlError::from)
        })?;
        Ok(total as u64)
    }

    async fn find_last(&self) -> Result<Option<Movie>, MovieError> {
        let movie = on_connection!(self.session, |conn| {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
            builder
                .push(MOVIE_COLUMNS)
                .push(" FROM movies m ORDER BY m.created_at DESC, m.id DESC LIMIT 1");
            let row: Option<MovieRow> = builder
                .build_query_as()
                .fetch_optional(&mut *conn)
                .await
                .map_err(SqlError::from)?;
            hydrate(conn, row.into_iter().collect()).await
        })?;
        Ok(movie.into_iter().next())
    }
}
