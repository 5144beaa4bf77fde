//! Rating entity and its sortable fields

use chrono::{DateTime, SubsecRound, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::value_objects::AverageRating;
use crate::ids::{MovieId, RatingId, UserId};

/// A user's rating of a movie
///
/// At most one rating exists per `(movie_id, user_id)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    id: RatingId,
    movie_id: MovieId,
    user_id: UserId,
    average_rating: AverageRating,
    created_at: DateTime<Utc>,
}

impl Rating {
    /// Create a new rating with a fresh id and creation timestamp
    pub fn create(movie_id: MovieId, user_id: UserId, average_rating: AverageRating) -> Self {
        Self {
            id: RatingId::new(),
            movie_id,
            user_id,
            average_rating,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Rebuild a rating loaded from storage
    pub fn from_parts(
        id: RatingId,
        movie_id: MovieId,
        user_id: UserId,
        average_rating: AverageRating,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            movie_id,
            user_id,
            average_rating,
            created_at,
        }
    }

    /// Replace the score
    pub fn update(&mut self, average_rating: AverageRating) {
        self.average_rating = average_rating;
    }

    pub fn id(&self) -> &RatingId {
        &self.id
    }

    pub fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn average_rating(&self) -> AverageRating {
        self.average_rating
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

/// Rating attributes a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSortField {
    MovieId,
    UserId,
    AverageRating,
    CreatedAt,
}

impl RatingSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingSortField::MovieId => "movieId",
            RatingSortField::UserId => "userId",
            RatingSortField::AverageRating => "averageRating",
            RatingSortField::CreatedAt => "createdAt",
        }
    }

    /// Compare two ratings on this field, ascending
    pub fn compare(&self, a: &Rating, b: &Rating) -> Ordering {
        match self {
            RatingSortField::MovieId => a.movie_id().cmp(b.movie_id()),
            RatingSortField::UserId => a.user_id().cmp(b.user_id()),
            RatingSortField::AverageRating => a
                .average_rating()
                .value()
                .total_cmp(&b.average_rating().value()),
            RatingSortField::CreatedAt => a.created_at().cmp(b.created_at()),
        }
    }
}

impl FromStr for RatingSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "movieId" | "movie_id" => Ok(RatingSortField::MovieId),
            "userId" | "user_id" => Ok(RatingSortField::UserId),
            "averageRating" | "average_rating" => Ok(RatingSortField::AverageRating),
            "createdAt" | "created_at" => Ok(RatingSortField::CreatedAt),
            other => Err(format!("Unknown rating sort field '{}'", other)),
        }
    }
}

impl fmt::Display for RatingSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_creation_and_update() {
        let movie_id = MovieId::new();
        let user_id = UserId::new();
        let mut rating = Rating::create(movie_id, user_id, AverageRating::new(6.0).unwrap());

        assert_eq!(rating.movie_id(), &movie_id);
        assert_eq!(rating.user_id(), &user_id);

        let id = *rating.id();
        rating.update(AverageRating::new(9.5).unwrap());

        assert_eq!(rating.average_rating().value(), 9.5);
        assert_eq!(rating.id(), &id);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!(
            "averageRating".parse::<RatingSortField>().unwrap(),
            RatingSortField::AverageRating
        );
        assert!("stars".parse::<RatingSortField>().is_err());
    }
}
