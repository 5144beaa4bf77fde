//! Row structs and their conversions to and from domain values
//!
//! Identifiers are stored as hyphenated UUID text and timestamps as
//! fixed-width RFC 3339 text, so both sort correctly as strings.

use chrono::{DateTime, SecondsFormat, Utc};
use marquee_domain::movies::value_objects::{
    AgeRestriction, AverageRating, Description, Duration, MovieName, ProductionCountry,
    ReleaseYear,
};
use marquee_domain::movies::{DetailKind, Movie, MovieBasic, MovieDetail};
use marquee_domain::ratings::{self, Rating};
use marquee_domain::IdParseError;
use std::str::FromStr;

use crate::error::SqlError;

pub(crate) const MOVIE_COLUMNS: &str = "m.id AS id, m.name AS name, \
     m.description AS description, m.release_year AS release_year, m.duration AS duration, \
     m.age_restriction AS age_restriction, m.average_rating AS average_rating, \
     m.production_country AS production_country, m.created_at AS created_at";

pub(crate) const RATING_COLUMNS: &str = "id, movie_id, user_id, average_rating, created_at";

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(table: &'static str, raw: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| SqlError::corrupt_row(table, format!("bad timestamp '{}': {}", raw, e)))
}

fn parse_id<T>(table: &'static str, raw: &str) -> Result<T, SqlError>
where
    T: FromStr<Err = IdParseError>,
{
    raw.parse()
        .map_err(|e: IdParseError| SqlError::corrupt_row(table, e.to_string()))
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MovieRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub release_year: String,
    pub duration: i64,
    pub age_restriction: i64,
    pub average_rating: f64,
    pub production_country: String,
    pub created_at: String,
}

impl MovieRow {
    /// Rebuild the aggregate from its row and its child entries
    pub fn into_movie(self, details: Vec<MovieDetail>) -> Result<Movie, SqlError> {
        let name = MovieName::new(self.name)
            .map_err(|e| SqlError::corrupt_row("movies", e.to_string()))?;

        Ok(Movie::from_parts(
            parse_id("movies", &self.id)?,
            MovieBasic {
                name,
                description: Description::new(self.description),
                release_year: ReleaseYear::new(self.release_year),
                duration: Duration::new(self.duration),
                age_restriction: AgeRestriction::new(self.age_restriction),
                average_rating: AverageRating::new(self.average_rating),
                production_country: ProductionCountry::new(self.production_country),
            },
            details,
            parse_timestamp("movies", &self.created_at)?,
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MovieDetailRow {
    pub id: String,
    pub movie_id: String,
    pub kind: String,
    pub value: String,
}

impl TryFrom<MovieDetailRow> for MovieDetail {
    type Error = SqlError;

    fn try_from(row: MovieDetailRow) -> Result<Self, Self::Error> {
        let kind = DetailKind::from_str(&row.kind)
            .map_err(|reason| SqlError::corrupt_row("movie_details", reason))?;

        Ok(MovieDetail::from_parts(
            parse_id("movie_details", &row.id)?,
            parse_id("movie_details", &row.movie_id)?,
            kind,
            row.value,
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RatingRow {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub average_rating: f64,
    pub created_at: String,
}

impl TryFrom<RatingRow> for Rating {
    type Error = SqlError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let average_rating = ratings::AverageRating::new(row.average_rating)
            .map_err(|e| SqlError::corrupt_row("rating", e.to_string()))?;

        Ok(Rating::from_parts(
            parse_id("rating", &row.id)?,
            parse_id("rating", &row.movie_id)?,
            parse_id("rating", &row.user_id)?,
            average_rating,
            parse_timestamp("rating", &row.created_at)?,
        ))
    }
}
